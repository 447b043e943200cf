//! Motion and collision engine.

use crate::types::*;
use rand::Rng;

/// What the ball touched during one update
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Contacts {
    /// Bounced off the top or bottom wall
    pub wall: bool,
    /// Paddle that returned the ball
    pub paddle: Option<Side>,
    /// Side that scored because the ball left the field
    pub scorer: Option<Side>,
}

/// Physics calculations for game simulation
pub struct Physics;

impl Physics {
    /// Move a paddle by its intent and keep it inside the field
    pub fn update_paddle(paddle: &mut Paddle, bounds: &Bounds) {
        paddle.y += paddle.intent.sign() * paddle.speed;
        Self::clamp_paddle(paddle, bounds);
    }

    /// Constrain paddle to field bounds
    pub fn clamp_paddle(paddle: &mut Paddle, bounds: &Bounds) {
        paddle.y = paddle.y.clamp(0.0, paddle.max_y(bounds));
    }

    /// Advance the ball one tick and resolve walls, paddles and exits.
    ///
    /// A held ball (grace window) does not move and touches nothing.
    pub fn update_ball(
        ball: &mut Ball,
        paddles: &[Paddle; 2],
        bounds: &Bounds,
        speed_growth: f32,
        bounce_spread: f32,
    ) -> Contacts {
        let mut contacts = Contacts::default();
        if ball.paused {
            return contacts;
        }

        ball.x += ball.vx;
        ball.y += ball.vy;

        contacts.wall = Self::reflect_walls(ball, bounds);

        for side in [Side::Left, Side::Right] {
            let paddle = &paddles[side.index()];
            if Self::check_paddle_collision(ball, paddle, side, speed_growth, bounce_spread) {
                contacts.paddle = Some(side);
            }
        }

        contacts.scorer = Self::check_scoring(ball, bounds);
        contacts
    }

    /// Bounce off top/bottom walls. Returns true on contact.
    pub fn reflect_walls(ball: &mut Ball, bounds: &Bounds) -> bool {
        if ball.y - ball.radius < 0.0 {
            ball.y = ball.radius;
            ball.vy = -ball.vy;
            true
        } else if ball.y + ball.radius > bounds.height {
            ball.y = bounds.height - ball.radius;
            ball.vy = -ball.vy;
            true
        } else {
            false
        }
    }

    /// Map a hit position on the paddle face (0 = top edge, 1 = bottom
    /// edge) to a bounce angle. The center returns the ball flat.
    pub fn bounce_angle(hit_pos: f32, bounce_spread: f32) -> f32 {
        (hit_pos - 0.5) * bounce_spread
    }

    /// Check for paddle-ball collision and handle it.
    ///
    /// Only a ball travelling toward the paddle can hit it, so a ball that
    /// is still overlapping after a return is not hit again.
    pub fn check_paddle_collision(
        ball: &mut Ball,
        paddle: &Paddle,
        side: Side,
        speed_growth: f32,
        bounce_spread: f32,
    ) -> bool {
        let (crossed_face, approaching) = match side {
            Side::Left => (ball.x - ball.radius < paddle.x + paddle.width, ball.vx < 0.0),
            Side::Right => (ball.x + ball.radius > paddle.x, ball.vx > 0.0),
        };
        let within = ball.y >= paddle.y && ball.y < paddle.y + paddle.height;

        if !(crossed_face && within && approaching) {
            return false;
        }

        let hit_pos = (ball.y - paddle.y) / paddle.height;
        let angle = Self::bounce_angle(hit_pos, bounce_spread);

        // Speed up ball, then split the new speed along the bounce angle
        ball.speed *= speed_growth;
        let away = match side {
            Side::Left => 1.0,
            Side::Right => -1.0,
        };
        ball.vx = away * ball.speed * angle.cos();
        ball.vy = ball.speed * angle.sin();

        true
    }

    /// Check if ball left the field (scoring condition)
    pub fn check_scoring(ball: &Ball, bounds: &Bounds) -> Option<Side> {
        if ball.x - ball.radius < 0.0 {
            Some(Side::Right) // Right player scored
        } else if ball.x + ball.radius > bounds.width {
            Some(Side::Left) // Left player scored
        } else {
            None
        }
    }

    /// Center the ball and launch it in a random direction at `base_speed`
    pub fn serve_ball<R: Rng + ?Sized>(
        ball: &mut Ball,
        bounds: &Bounds,
        base_speed: f32,
        rng: &mut R,
    ) {
        ball.x = bounds.width / 2.0;
        ball.y = bounds.height / 2.0;
        ball.speed = base_speed;

        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        ball.vx = direction * base_speed;
        ball.vy = base_speed * rng.gen_range(-0.5..0.5);
    }
}
