//! Main game loop and state management.

use crate::opponent::{Opponent, OpponentParams};
use crate::physics::Physics;
use crate::profile::DifficultyProfile;
use crate::scheduler::{Scheduler, Task, TaskHandle};
use crate::scoring::{Scoreboard, Verdict};
use crate::types::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, trace};

/// One play session: entities, scores, loop state and pending timers
pub struct Game {
    pub config: Config,
    pub profile: DifficultyProfile,
    pub mode: GameMode,
    pub state: LoopState,
    pub tick: Tick,
    pub bounds: Bounds,
    pub paddles: [Paddle; 2],
    pub ball: Ball,
    pub board: Scoreboard,
    pub opponent: OpponentParams,
    queued: [Option<Intent>; 2],
    scheduler: Scheduler,
    grace: Option<TaskHandle>,
    events: Vec<Event>,
    rng: StdRng,
}

impl Game {
    /// Create a new single-player session with the given configuration.
    ///
    /// Both `config` and `profile` must pass `validate()`; checking them is
    /// the caller's job (debug builds assert it).
    pub fn new(config: Config, profile: DifficultyProfile) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid config: {config:?}");
        debug_assert!(profile.validate().is_ok(), "invalid profile: {profile:?}");
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let bounds = config.bounds;
        let opponent = OpponentParams::for_level(1, &config, &profile);

        let mut game = Game {
            config,
            profile,
            mode: GameMode::SinglePlayer,
            state: LoopState::Idle,
            tick: 0,
            bounds,
            paddles: [
                Paddle::new(0.0, 0.0, config.paddle_width, config.paddle_height, 0.0),
                Paddle::new(0.0, 0.0, config.paddle_width, config.paddle_height, 0.0),
            ],
            ball: Ball::new(bounds.width / 2.0, bounds.height / 2.0, config.ball_radius),
            board: Scoreboard::new(),
            opponent,
            queued: [None, None],
            scheduler: Scheduler::new(),
            grace: None,
            events: Vec::new(),
            rng,
        };

        game.reset_match();
        game
    }

    /// Queue the primary paddle's intent for the next tick
    pub fn set_primary_vertical(&mut self, intent: Intent) {
        if self.state == LoopState::Running {
            self.queued[Side::Left.index()] = Some(intent);
        }
    }

    /// Queue the second player's intent (two-player mode only)
    pub fn set_secondary_vertical(&mut self, intent: Intent) {
        if self.state == LoopState::Running && self.mode == GameMode::TwoPlayer {
            self.queued[Side::Right.index()] = Some(intent);
        }
    }

    /// Apply a lifecycle command. Returns false when the command does not
    /// apply in the current state (it is then ignored).
    pub fn command(&mut self, command: Command) -> bool {
        match (command, self.state) {
            (Command::Start, LoopState::Idle | LoopState::Paused) => {
                info!(from = ?self.state, "game running");
                self.state = LoopState::Running;
                true
            }
            (Command::Pause, LoopState::Running) => {
                info!(tick = self.tick, "game paused");
                self.halt_timers();
                self.clear_intents();
                self.state = LoopState::Paused;
                true
            }
            (Command::Reset, _) => {
                info!("game reset");
                self.reset_match();
                self.state = LoopState::Idle;
                true
            }
            (Command::PlayAgain, LoopState::Ended) => {
                if self.board.phase == Phase::LevelCleared {
                    info!(level = self.board.level, "continuing to next level");
                    self.continue_level();
                } else {
                    info!("starting a new match");
                    self.reset_match();
                }
                self.state = LoopState::Running;
                true
            }
            (Command::SetMode(mode), state) if state != LoopState::Running => {
                info!(?mode, "mode switched");
                self.mode = mode;
                self.reset_match();
                self.state = LoopState::Idle;
                true
            }
            (command, state) => {
                debug!(?command, ?state, "command ignored");
                false
            }
        }
    }

    /// Resize the playfield, rescaling stored positions proportionally
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        let bounds = Bounds::new(width, height);
        if !bounds.is_valid() {
            debug!(width, height, "ignoring unusable bounds");
            return;
        }

        let sx = width / self.bounds.width;
        let sy = height / self.bounds.height;

        for side in [Side::Left, Side::Right] {
            let paddle = &mut self.paddles[side.index()];
            paddle.x = self.config.paddle_x(side, &bounds);
            paddle.y *= sy;
            Physics::clamp_paddle(paddle, &bounds);
        }

        let r = self.ball.radius;
        self.ball.x = (self.ball.x * sx).min(width - r).max(r.min(width / 2.0));
        self.ball.y = (self.ball.y * sy).min(height - r).max(r.min(height / 2.0));

        debug!(width, height, "bounds changed");
        self.bounds = bounds;
    }

    /// Advance the session by one host frame.
    ///
    /// `now` is the host clock (any fixed epoch). Due timers fire first;
    /// the simulation itself only advances while running.
    pub fn tick(&mut self, now: Duration) -> Frame {
        for task in self.scheduler.poll(now) {
            self.run_task(task);
        }

        if self.state == LoopState::Running {
            self.tick += 1;
            self.apply_intents();

            Physics::update_paddle(&mut self.paddles[Side::Left.index()], &self.bounds);
            self.update_secondary();
            self.update_ball(now);

            // Held ball without a pending release: freshly scored, or resumed
            // after a pause discarded the old timer
            if self.state == LoopState::Running && self.ball.paused && !self.grace_pending() {
                let due = now + Duration::from_millis(self.config.grace_ms);
                self.grace = Some(self.scheduler.schedule(due, Task::ReleaseBall));
            }
        }

        Frame {
            view: self.view(),
            events: std::mem::take(&mut self.events),
        }
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self) -> View {
        View {
            tick: self.tick,
            state: self.state,
            phase: self.board.phase,
            mode: self.mode,
            bounds: self.bounds,
            left: PaddleView::from(&self.paddles[Side::Left.index()]),
            right: PaddleView::from(&self.paddles[Side::Right.index()]),
            ball_x: self.ball.x,
            ball_y: self.ball.y,
            ball_radius: self.ball.radius,
            score: self.board.score,
            level: self.board.level,
        }
    }

    pub fn score(&self) -> Score {
        self.board.score
    }

    pub fn level(&self) -> u32 {
        self.board.level
    }

    /// Whether the grace window release is still scheduled
    pub fn grace_pending(&self) -> bool {
        self.grace
            .is_some_and(|handle| self.scheduler.is_pending(handle))
    }

    /// Number of timers (grace window, stinger notes) waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Check if the game is active (accepting inputs)
    pub fn is_active(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> &'static str {
        match (self.state, self.board.phase) {
            (LoopState::Idle, _) => "Press start",
            (LoopState::Paused, _) => "Paused",
            (_, Phase::LevelCleared) => "Level cleared!",
            (_, Phase::GameOver(Side::Left)) if self.mode == GameMode::SinglePlayer => {
                "You win!"
            }
            (_, Phase::GameOver(Side::Right)) if self.mode == GameMode::SinglePlayer => {
                "Game over"
            }
            (_, Phase::GameOver(Side::Left)) => "Left player wins!",
            (_, Phase::GameOver(Side::Right)) => "Right player wins!",
            (_, Phase::PointScored) => "Point scored!",
            (_, Phase::Rallying) => "Playing",
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::ReleaseBall => {
                self.ball.paused = false;
                self.board.resume_rally();
                self.grace = None;
            }
            Task::StingerNote { cue, note } => self.events.push(Event::Sound { cue, note }),
        }
    }

    fn apply_intents(&mut self) {
        for (paddle, queued) in self.paddles.iter_mut().zip(self.queued.iter_mut()) {
            if let Some(intent) = queued.take() {
                paddle.intent = intent;
            }
        }
    }

    fn update_secondary(&mut self) {
        let index = Side::Right.index();
        if self.mode == GameMode::SinglePlayer {
            self.paddles[index].intent = Opponent::decide(
                &self.paddles[index],
                &self.ball,
                &self.opponent,
                self.config.aim_error,
                &mut self.rng,
            );
        }
        Physics::update_paddle(&mut self.paddles[index], &self.bounds);
    }

    fn update_ball(&mut self, now: Duration) {
        let contacts = Physics::update_ball(
            &mut self.ball,
            &self.paddles,
            &self.bounds,
            self.profile.speed_growth,
            self.config.bounce_spread,
        );

        if contacts.wall {
            self.cue(SoundCue::WallHit);
        }
        if let Some(side) = contacts.paddle {
            trace!(?side, speed = self.ball.speed, "paddle hit");
            self.cue(SoundCue::PaddleHit);
        }
        if let Some(scorer) = contacts.scorer {
            self.handle_score(scorer, now);
        }
    }

    /// Handle a scoring event
    fn handle_score(&mut self, scorer: Side, now: Duration) {
        let score = self.board.record_point(scorer);
        debug!(?scorer, left = score.left, right = score.right, "point scored");
        self.events.push(Event::Scored { scorer, score });

        self.serve(true);
        self.cue(SoundCue::Score);

        match self.board.check_winner(self.mode, self.config.winning_score) {
            Verdict::Continue => {}
            Verdict::LevelCleared { level } => {
                self.opponent = OpponentParams::for_level(level, &self.config, &self.profile);
                self.paddles[Side::Right.index()].speed = self.opponent.speed;
                info!(level, opponent_speed = self.opponent.speed, "level cleared");
                self.events.push(Event::LevelCleared { level });
                self.end(SoundCue::Win, now);
            }
            Verdict::GameOver(winner) => {
                info!(?winner, "game over");
                self.events.push(Event::GameOver { winner });
                let stinger = match (self.mode, winner) {
                    (GameMode::SinglePlayer, Side::Right) => SoundCue::Lose,
                    _ => SoundCue::Win,
                };
                self.end(stinger, now);
            }
        }
    }

    /// Stop the loop and play the closing stinger
    fn end(&mut self, stinger: SoundCue, now: Duration) {
        self.halt_timers();
        self.clear_intents();
        self.state = LoopState::Ended;

        self.events.push(Event::Sound {
            cue: stinger,
            note: 0,
        });
        let interval = Duration::from_millis(self.config.stinger_interval_ms);
        for note in 1..stinger.notes() {
            let due = now + interval * u32::from(note);
            self.scheduler
                .schedule(due, Task::StingerNote { cue: stinger, note });
        }
    }

    fn cue(&mut self, cue: SoundCue) {
        self.events.push(Event::Sound { cue, note: 0 });
    }

    fn serve(&mut self, paused: bool) {
        Physics::serve_ball(
            &mut self.ball,
            &self.bounds,
            self.profile.base_ball_speed,
            &mut self.rng,
        );
        self.ball.paused = paused;
    }

    fn halt_timers(&mut self) {
        self.scheduler.cancel_all();
        self.grace = None;
    }

    fn clear_intents(&mut self) {
        self.queued = [None, None];
        for paddle in &mut self.paddles {
            paddle.intent = Intent::Hold;
        }
    }

    fn center_paddles(&mut self) {
        let right_speed = match self.mode {
            GameMode::SinglePlayer => self.opponent.speed,
            GameMode::TwoPlayer => self.config.paddle_speed,
        };
        for (side, speed) in [
            (Side::Left, self.config.paddle_speed),
            (Side::Right, right_speed),
        ] {
            let paddle = &mut self.paddles[side.index()];
            paddle.x = self.config.paddle_x(side, &self.bounds);
            paddle.y = (self.bounds.height - paddle.height) / 2.0;
            paddle.speed = speed;
            Physics::clamp_paddle(paddle, &self.bounds);
        }
    }

    /// Full reset: scores, level, opponent difficulty, positions, timers
    fn reset_match(&mut self) {
        self.halt_timers();
        self.clear_intents();
        self.events.clear();
        self.tick = 0;
        self.board.reset_all();
        self.opponent = OpponentParams::for_level(1, &self.config, &self.profile);
        self.center_paddles();
        self.serve(false);
    }

    /// Next level: points cleared, level and opponent difficulty kept
    fn continue_level(&mut self) {
        self.halt_timers();
        self.clear_intents();
        self.board.reset_points();
        self.center_paddles();
        self.serve(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn test_config() -> Config {
        Config {
            seed: Some(0xC0FFEE),
            ..Config::default()
        }
    }

    fn new_game() -> Game {
        Game::new(test_config(), DifficultyProfile::desktop())
    }

    /// Put the ball one step from leaving the field on the side that
    /// concedes, clear of both paddles
    fn send_ball_out(game: &mut Game, scorer: Side) {
        game.ball.paused = false;
        game.ball.y = 40.0;
        game.ball.vy = 0.0;
        match scorer {
            Side::Left => {
                game.ball.x = game.bounds.width - 10.0;
                game.ball.vx = 5.0;
            }
            Side::Right => {
                game.ball.x = 10.0;
                game.ball.vx = -5.0;
            }
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid config")]
    fn test_new_asserts_valid_config() {
        Game::new(
            Config {
                paddle_height: 0.0,
                ..test_config()
            },
            DifficultyProfile::desktop(),
        );
    }

    fn sounds(frame: &Frame) -> Vec<(SoundCue, u8)> {
        frame
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Sound { cue, note } => Some((*cue, *note)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_game_creation() {
        let game = new_game();

        assert_eq!(game.tick, 0);
        assert_eq!(game.state, LoopState::Idle);
        assert_eq!(game.mode, GameMode::SinglePlayer);
        assert_eq!(game.score(), Score::default());
        assert_eq!(game.level(), 1);
        assert_eq!(game.ball.x, 400.0);
        assert_eq!(game.ball.y, 250.0);
        assert!(!game.ball.paused);
        assert_eq!(game.paddles[0].y, 215.0);
        assert_eq!(game.paddles[1].y, 215.0);
        assert_eq!(game.paddles[0].x, 10.0);
        assert_eq!(game.paddles[1].x, 780.0);
        assert_eq!(game.paddles[1].speed, 3.0);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut game = new_game();

        assert!(game.command(Command::Start));
        assert_eq!(game.state, LoopState::Running);
        assert!(!game.command(Command::Start)); // Already running

        assert!(game.command(Command::Pause));
        assert_eq!(game.state, LoopState::Paused);
        assert!(!game.command(Command::Pause));

        assert!(game.command(Command::Start));
        assert_eq!(game.state, LoopState::Running);

        // Play again only applies once the game has ended
        assert!(!game.command(Command::PlayAgain));

        assert!(game.command(Command::Reset));
        assert_eq!(game.state, LoopState::Idle);
    }

    #[test]
    fn test_idle_tick_does_not_simulate() {
        let mut game = new_game();
        let ball = game.ball;

        let frame = game.tick(at(16));

        assert_eq!(game.tick, 0);
        assert_eq!(game.ball, ball);
        assert_eq!(frame.view.state, LoopState::Idle);
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_input_ignored_when_not_running() {
        let mut game = new_game();
        game.set_primary_vertical(Intent::Down);
        game.command(Command::Start);
        game.tick(at(16));

        assert_eq!(game.paddles[0].y, 215.0);
    }

    #[test]
    fn test_paddle_movement_during_play() {
        let mut game = new_game();
        game.command(Command::Start);

        game.set_primary_vertical(Intent::Up);
        game.tick(at(16));
        assert_eq!(game.paddles[0].y, 207.0);

        // Intent persists until changed
        game.tick(at(32));
        assert_eq!(game.paddles[0].y, 199.0);

        game.set_primary_vertical(Intent::Hold);
        game.tick(at(48));
        assert_eq!(game.paddles[0].y, 199.0);
    }

    #[test]
    fn test_paddle_clamped_over_many_ticks() {
        let mut game = new_game();
        game.command(Command::Start);
        game.set_primary_vertical(Intent::Down);

        for i in 1..=120 {
            game.tick(at(i * 16));
            let paddle = game.paddles[0];
            assert!(paddle.y >= 0.0 && paddle.y <= game.bounds.height - paddle.height);
        }
        assert_eq!(game.paddles[0].y, 430.0);
    }

    #[test]
    fn test_scoring_is_exclusive() {
        let mut game = new_game();
        game.command(Command::Start);

        send_ball_out(&mut game, Side::Left);
        let frame = game.tick(at(16));

        assert_eq!(game.score(), Score { left: 1, right: 0 });
        assert!(frame.events.contains(&Event::Scored {
            scorer: Side::Left,
            score: Score { left: 1, right: 0 },
        }));
        assert!(sounds(&frame).contains(&(SoundCue::Score, 0)));

        send_ball_out(&mut game, Side::Right);
        game.tick(at(1000));
        assert_eq!(game.score(), Score { left: 1, right: 1 });
    }

    #[test]
    fn test_ball_held_during_grace_window() {
        let mut game = new_game();
        game.command(Command::Start);
        send_ball_out(&mut game, Side::Left);
        game.tick(at(1000));

        assert!(game.ball.paused);
        assert!(game.grace_pending());
        assert_eq!(game.board.phase, Phase::PointScored);
        assert_eq!((game.ball.x, game.ball.y), (400.0, 250.0));

        // Repeated ticks inside the window leave the ball alone
        for ms in [1016, 1100, 1200, 1249] {
            game.tick(at(ms));
            assert_eq!((game.ball.x, game.ball.y), (400.0, 250.0));
        }

        // Window elapses on the host clock, not the tick count
        game.tick(at(1250));
        assert!(!game.ball.paused);
        assert_eq!(game.board.phase, Phase::Rallying);
        assert_ne!(game.ball.x, 400.0);
    }

    #[test]
    fn test_pause_discards_grace_timer_and_resume_rearms() {
        let mut game = new_game();
        game.command(Command::Start);
        send_ball_out(&mut game, Side::Right);
        game.tick(at(0));
        assert!(game.grace_pending());

        game.command(Command::Pause);
        assert_eq!(game.pending_timers(), 0);

        // Old release time passes while paused: nothing happens
        game.tick(at(300));
        assert!(game.ball.paused);

        game.command(Command::Start);
        game.tick(at(400));
        assert!(game.ball.paused, "resume re-arms a full grace window");
        game.tick(at(600));
        assert!(game.ball.paused);
        game.tick(at(650));
        assert!(!game.ball.paused);
    }

    #[test]
    fn test_reset_during_grace_window() {
        let mut game = new_game();
        game.command(Command::Start);
        send_ball_out(&mut game, Side::Left);
        game.tick(at(0));
        assert!(game.ball.paused);

        game.command(Command::Reset);

        assert!(!game.ball.paused);
        assert_eq!((game.ball.x, game.ball.y), (400.0, 250.0));
        assert_eq!(game.pending_timers(), 0);
        assert_eq!(game.score(), Score::default());

        // No stale release fires later
        let frame = game.tick(at(250));
        assert!(frame.events.is_empty());
        assert_eq!(game.state, LoopState::Idle);
    }

    #[test]
    fn test_level_cleared_advances_opponent() {
        let mut game = Game::new(
            Config {
                winning_score: 5,
                ..test_config()
            },
            DifficultyProfile::desktop(),
        );
        game.command(Command::Start);

        let mut last = None;
        for i in 0..5 {
            send_ball_out(&mut game, Side::Left);
            last = Some(game.tick(at(i * 1000)));
        }
        let frame = last.unwrap();

        assert_eq!(game.state, LoopState::Ended);
        assert_eq!(game.board.phase, Phase::LevelCleared);
        assert_eq!(game.level(), 2);
        assert_eq!(game.opponent.speed, 3.5);
        assert_eq!(game.paddles[1].speed, 3.5);
        assert!(frame.events.contains(&Event::LevelCleared { level: 2 }));
        assert!(sounds(&frame).contains(&(SoundCue::Win, 0)));

        // Continue keeps level and opponent speed, clears points
        assert!(game.command(Command::PlayAgain));
        assert_eq!(game.state, LoopState::Running);
        assert_eq!(game.score(), Score::default());
        assert_eq!(game.level(), 2);
        assert_eq!(game.paddles[1].speed, 3.5);
        assert!(!game.ball.paused);
    }

    #[test]
    fn test_loss_requires_full_reset() {
        let mut game = Game::new(
            Config {
                winning_score: 2,
                ..test_config()
            },
            DifficultyProfile::desktop(),
        );
        game.board.level = 3;
        game.command(Command::Start);

        send_ball_out(&mut game, Side::Right);
        game.tick(at(0));
        send_ball_out(&mut game, Side::Right);
        let frame = game.tick(at(1000));

        assert_eq!(game.state, LoopState::Ended);
        assert_eq!(game.board.phase, Phase::GameOver(Side::Right));
        assert!(frame.events.contains(&Event::GameOver {
            winner: Side::Right
        }));
        assert!(sounds(&frame).contains(&(SoundCue::Lose, 0)));
        assert_eq!(game.status_string(), "Game over");

        // Ended: simulation frozen
        let ball = game.ball;
        game.tick(at(1016));
        assert_eq!(game.ball, ball);

        assert!(game.command(Command::PlayAgain));
        assert_eq!(game.level(), 1);
        assert_eq!(game.score(), Score::default());
        assert_eq!(game.paddles[1].speed, 3.0);
    }

    #[test]
    fn test_stinger_notes_follow_on_timer() {
        let mut game = Game::new(
            Config {
                winning_score: 1,
                ..test_config()
            },
            DifficultyProfile::desktop(),
        );
        game.command(Command::Start);
        send_ball_out(&mut game, Side::Left);
        game.tick(at(1000));
        assert_eq!(game.pending_timers(), 3);

        let frame = game.tick(at(1150));
        assert_eq!(sounds(&frame), vec![(SoundCue::Win, 1)]);

        let frame = game.tick(at(1500));
        assert_eq!(sounds(&frame), vec![(SoundCue::Win, 2), (SoundCue::Win, 3)]);
    }

    #[test]
    fn test_reset_cancels_stinger() {
        let mut game = Game::new(
            Config {
                winning_score: 1,
                ..test_config()
            },
            DifficultyProfile::desktop(),
        );
        game.command(Command::Start);
        send_ball_out(&mut game, Side::Right);
        game.tick(at(0));
        assert!(game.pending_timers() > 0);

        game.command(Command::Reset);
        let frame = game.tick(at(5000));
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_two_player_mode() {
        let mut game = new_game();
        assert!(game.command(Command::SetMode(GameMode::TwoPlayer)));
        assert_eq!(game.paddles[1].speed, 8.0);
        game.command(Command::Start);

        game.set_secondary_vertical(Intent::Up);
        game.tick(at(16));
        assert_eq!(game.paddles[1].y, 207.0);

        game.set_secondary_vertical(Intent::Hold);
        game.tick(at(32));
        assert_eq!(game.paddles[1].y, 207.0);
    }

    #[test]
    fn test_two_player_win_names_side() {
        let mut game = Game::new(
            Config {
                winning_score: 1,
                ..test_config()
            },
            DifficultyProfile::desktop(),
        );
        game.command(Command::SetMode(GameMode::TwoPlayer));
        game.command(Command::Start);
        send_ball_out(&mut game, Side::Right);
        let frame = game.tick(at(0));

        assert_eq!(game.board.phase, Phase::GameOver(Side::Right));
        assert_eq!(game.level(), 1);
        assert!(sounds(&frame).contains(&(SoundCue::Win, 0)));
        assert_eq!(game.status_string(), "Right player wins!");
    }

    #[test]
    fn test_secondary_intent_ignored_in_single_player() {
        let mut game = new_game();
        game.command(Command::Start);
        game.set_secondary_vertical(Intent::Up);
        game.tick(at(16));

        // Opponent holds: ball is level with its paddle center
        assert_eq!(game.paddles[1].y, 215.0);
    }

    #[test]
    fn test_mode_switch_only_when_not_running() {
        let mut game = new_game();
        game.command(Command::Start);
        game.tick(at(16));

        assert!(!game.command(Command::SetMode(GameMode::TwoPlayer)));
        assert_eq!(game.mode, GameMode::SinglePlayer);

        game.command(Command::Pause);
        assert!(game.command(Command::SetMode(GameMode::TwoPlayer)));
        assert_eq!(game.mode, GameMode::TwoPlayer);
        assert_eq!(game.state, LoopState::Idle);
        assert_eq!(game.tick, 0);
    }

    #[test]
    fn test_set_bounds_rescales() {
        let mut game = new_game();
        game.set_bounds(1600.0, 1000.0);

        assert_eq!(game.bounds, Bounds::new(1600.0, 1000.0));
        assert_eq!(game.paddles[0].y, 430.0);
        assert_eq!(game.paddles[1].x, 1580.0);
        assert_eq!((game.ball.x, game.ball.y), (800.0, 500.0));

        // Shrinking clamps the paddles back inside
        game.set_bounds(800.0, 100.0);
        assert_eq!(game.paddles[0].y, 30.0);
        assert!(game.ball.y + game.ball.radius <= 100.0);
    }

    #[test]
    fn test_set_bounds_ignores_unusable_sizes() {
        let mut game = new_game();
        game.set_bounds(0.0, 500.0);
        game.set_bounds(f32::NAN, 500.0);
        game.set_bounds(800.0, -1.0);
        assert_eq!(game.bounds, Bounds::default());
    }

    #[test]
    fn test_view_generation() {
        let game = new_game();
        let view = game.view();

        assert_eq!(view.tick, game.tick);
        assert_eq!(view.state, game.state);
        assert_eq!(view.phase, Phase::Rallying);
        assert_eq!(view.left, PaddleView::from(&game.paddles[0]));
        assert_eq!(view.right, PaddleView::from(&game.paddles[1]));
        assert_eq!(view.ball_x, game.ball.x);
        assert_eq!(view.ball_radius, 8.0);
        assert_eq!(view.score, game.score());
        assert_eq!(view.level, 1);
    }

    #[test]
    fn test_status_string() {
        let mut game = new_game();
        assert_eq!(game.status_string(), "Press start");

        game.command(Command::Start);
        assert_eq!(game.status_string(), "Playing");
        assert!(game.is_active());

        game.command(Command::Pause);
        assert_eq!(game.status_string(), "Paused");
        assert!(!game.is_active());
    }
}
