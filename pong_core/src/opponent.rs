//! Scripted opponent for single-player mode.

use crate::profile::DifficultyProfile;
use crate::types::*;
use rand::Rng;

/// Opponent tuning derived from the current level
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpponentParams {
    /// Paddle speed (units per tick)
    pub speed: f32,
    /// Probability of misjudging the ball on a given tick
    pub error_chance: f32,
    /// Band around the target inside which the paddle holds still
    pub dead_zone: f32,
}

impl OpponentParams {
    pub fn for_level(level: u32, config: &Config, profile: &DifficultyProfile) -> Self {
        OpponentParams {
            speed: config.opponent_speed(level),
            error_chance: profile.error_chance(level),
            dead_zone: profile.dead_zone(level),
        }
    }
}

/// Opponent decision making
pub struct Opponent;

impl Opponent {
    /// Choose this tick's intent for the opponent paddle.
    ///
    /// With half the error chance the opponent hesitates and holds. Otherwise
    /// it may aim at a point up to `aim_error` away from the ball, then
    /// tracks that target outside its dead zone.
    pub fn decide<R: Rng + ?Sized>(
        paddle: &Paddle,
        ball: &Ball,
        params: &OpponentParams,
        aim_error: f32,
        rng: &mut R,
    ) -> Intent {
        let chance = f64::from(params.error_chance.clamp(0.0, 1.0));

        if chance > 0.0 && rng.gen_bool(chance / 2.0) {
            return Intent::Hold;
        }

        let mut target = ball.y;
        if chance > 0.0 && aim_error > 0.0 && rng.gen_bool(chance) {
            target += rng.gen_range(-aim_error..=aim_error);
        }

        Self::track(paddle.center_y(), target, params.dead_zone)
    }

    /// Exact tracking rule: close the gap once it exceeds the dead zone
    pub fn track(center: f32, target: f32, dead_zone: f32) -> Intent {
        if center < target - dead_zone {
            Intent::Down
        } else if center > target + dead_zone {
            Intent::Up
        } else {
            Intent::Hold
        }
    }
}
