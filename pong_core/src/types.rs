//! Core types and constants for the paddle ball simulation.

use std::fmt;

/// Tick counter type
pub type Tick = u32;

/// Player/paddle side
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Primary paddle, always human controlled
    Left,
    /// Opponent paddle, scripted in single-player, second human in two-player
    Right,
}

impl Side {
    /// Index into per-side arrays
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Vertical velocity intent for a paddle
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    Up,
    #[default]
    Hold,
    Down,
}

impl Intent {
    /// Build an intent from any signed axis value (only the sign matters)
    pub fn from_axis(axis: i8) -> Self {
        match axis.signum() {
            -1 => Intent::Up,
            1 => Intent::Down,
            _ => Intent::Hold,
        }
    }

    /// Direction multiplier in screen space (y grows downwards)
    pub fn sign(self) -> f32 {
        match self {
            Intent::Up => -1.0,
            Intent::Hold => 0.0,
            Intent::Down => 1.0,
        }
    }

    /// Steer a paddle toward a touch point.
    ///
    /// `target_center` is where the finger is; the paddle holds once its top
    /// edge is within 10 units of `target_center - height / 2`.
    pub fn toward(target_center: f32, paddle: &Paddle) -> Self {
        let target_y = target_center - paddle.height / 2.0;
        if target_y < paddle.y - TOUCH_BAND {
            Intent::Up
        } else if target_y > paddle.y + TOUCH_BAND {
            Intent::Down
        } else {
            Intent::Hold
        }
    }
}

const TOUCH_BAND: f32 = 10.0;

/// Who drives the right paddle
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameMode {
    #[default]
    SinglePlayer,
    TwoPlayer,
}

/// Loop scheduling state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoopState {
    /// Fresh session or after reset, waiting for start
    Idle,
    /// Ticks advance the simulation
    Running,
    /// Simulation frozen, state preserved
    Paused,
    /// Level cleared or game over, waiting for play-again or reset
    Ended,
}

/// Rally / scoring phase
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Ball in play
    Rallying,
    /// Someone scored, ball held at center for the grace window
    PointScored,
    /// Human reached the winning score in single-player
    LevelCleared,
    /// Match decided (winner)
    GameOver(Side),
}

/// Lifecycle commands issued by UI collaborators
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Start,
    Pause,
    Reset,
    PlayAgain,
    SetMode(GameMode),
}

/// Sound cues for the audio collaborator
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundCue {
    WallHit,
    PaddleHit,
    Score,
    Win,
    Lose,
}

impl SoundCue {
    /// Number of notes in the cue (stingers play several)
    pub fn notes(self) -> u8 {
        match self {
            SoundCue::Win => 4,
            SoundCue::Lose => 3,
            _ => 1,
        }
    }
}

/// Playfield rectangle
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Bounds { width, height }
    }

    /// Usable as a playfield: finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::new(800.0, 500.0)
    }
}

/// Paddle state. `y` is the top edge.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Units per tick
    pub speed: f32,
    pub intent: Intent,
}

impl Paddle {
    pub fn new(x: f32, y: f32, width: f32, height: f32, speed: f32) -> Self {
        Paddle {
            x,
            y,
            width,
            height,
            speed,
            intent: Intent::Hold,
        }
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Largest legal `y` inside the given bounds
    pub fn max_y(&self, bounds: &Bounds) -> f32 {
        (bounds.height - self.height).max(0.0)
    }
}

/// Ball state. `x`/`y` is the center.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Scalar speed, grows on every paddle hit
    pub speed: f32,
    pub vx: f32,
    pub vy: f32,
    /// Held at center during the post-score grace window
    pub paused: bool,
}

impl Ball {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Ball {
            x,
            y,
            radius,
            speed: 0.0,
            vx: 0.0,
            vy: 0.0,
            paused: false,
        }
    }
}

/// Points per side
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Game configuration
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Initial playfield size
    pub bounds: Bounds,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between a paddle and its side wall
    pub paddle_inset: f32,
    /// Human paddle speed (units per tick)
    pub paddle_speed: f32,
    pub ball_radius: f32,
    /// Points needed to clear a level or win the match
    pub winning_score: u32,
    /// Real-time delay before a served ball starts moving
    pub grace_ms: u64,
    /// Delay between stinger notes
    pub stinger_interval_ms: u64,
    /// Angle range spanned by a paddle face, edge to edge (radians)
    pub bounce_spread: f32,
    /// Opponent speed at level 1
    pub opponent_base_speed: f32,
    /// Opponent speed gained per level
    pub opponent_speed_step: f32,
    pub opponent_speed_cap: f32,
    /// Largest random offset applied to the opponent's target
    pub aim_error: f32,
    /// Fixed RNG seed, `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bounds: Bounds::default(),
            paddle_width: 10.0,
            paddle_height: 70.0,
            paddle_inset: 10.0,
            paddle_speed: 8.0,
            ball_radius: 8.0,
            winning_score: 10,
            grace_ms: 250,
            stinger_interval_ms: 150,
            bounce_spread: std::f32::consts::PI / 3.0,
            opponent_base_speed: 3.0,
            opponent_speed_step: 0.5,
            opponent_speed_cap: 7.0,
            aim_error: 50.0,
            seed: None,
        }
    }
}

impl Config {
    /// X position of a paddle's left edge for the given side
    pub fn paddle_x(&self, side: Side, bounds: &Bounds) -> f32 {
        match side {
            Side::Left => self.paddle_inset,
            Side::Right => bounds.width - self.paddle_inset - self.paddle_width,
        }
    }

    /// Opponent speed for a level, capped
    pub fn opponent_speed(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.opponent_base_speed + steps * self.opponent_speed_step).min(self.opponent_speed_cap)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds.is_valid() {
            return Err(ConfigError::InvalidBounds);
        }
        let fields = [
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_inset", self.paddle_inset),
            ("paddle_speed", self.paddle_speed),
            ("ball_radius", self.ball_radius),
            ("bounce_spread", self.bounce_spread),
            ("opponent_base_speed", self.opponent_base_speed),
            ("opponent_speed_step", self.opponent_speed_step),
            ("opponent_speed_cap", self.opponent_speed_cap),
            ("aim_error", self.aim_error),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::OutOfRange(name));
        }
        if self.paddle_height <= 0.0 || self.paddle_height > self.bounds.height {
            return Err(ConfigError::OutOfRange("paddle_height"));
        }
        if self.paddle_width <= 0.0 || self.paddle_inset < 0.0 {
            return Err(ConfigError::OutOfRange("paddle_width"));
        }
        if self.ball_radius <= 0.0 || self.ball_radius * 2.0 > self.bounds.height {
            return Err(ConfigError::OutOfRange("ball_radius"));
        }
        if self.paddle_speed <= 0.0 || self.opponent_base_speed <= 0.0 {
            return Err(ConfigError::OutOfRange("paddle_speed"));
        }
        if self.opponent_speed_cap < self.opponent_base_speed {
            return Err(ConfigError::OutOfRange("opponent_speed_cap"));
        }
        if self.winning_score == 0 {
            return Err(ConfigError::OutOfRange("winning_score"));
        }
        if !(0.0..std::f32::consts::PI).contains(&self.bounce_spread) {
            return Err(ConfigError::OutOfRange("bounce_spread"));
        }
        if self.aim_error < 0.0 {
            return Err(ConfigError::OutOfRange("aim_error"));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Playfield is empty, negative or not finite
    InvalidBounds,
    /// A field holds a value the engine cannot use
    OutOfRange(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBounds => write!(f, "bounds must be finite and positive"),
            ConfigError::OutOfRange(field) => write!(f, "config field `{field}` is out of range"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Rectangle of a paddle for rendering
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaddleView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<&Paddle> for PaddleView {
    fn from(paddle: &Paddle) -> Self {
        PaddleView {
            x: paddle.x,
            y: paddle.y,
            width: paddle.width,
            height: paddle.height,
        }
    }
}

/// View data for rendering
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    pub tick: Tick,
    pub state: LoopState,
    pub phase: Phase,
    pub mode: GameMode,
    pub bounds: Bounds,
    pub left: PaddleView,
    pub right: PaddleView,
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_radius: f32,
    pub score: Score,
    pub level: u32,
}

/// Game events that can occur during a tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// Play one note of a cue (`note` counts from 0)
    Sound { cue: SoundCue, note: u8 },
    /// Score changed, front ends should refresh their scoreboard
    Scored { scorer: Side, score: Score },
    /// Single-player level finished, `level` is the new level
    LevelCleared { level: u32 },
    GameOver { winner: Side },
}

/// Output of one tick
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub view: View,
    pub events: Vec<Event>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_index() {
        assert_eq!(Side::Left.index(), 0);
        assert_eq!(Side::Right.index(), 1);
    }

    #[test]
    fn test_intent_from_axis() {
        assert_eq!(Intent::from_axis(-1), Intent::Up);
        assert_eq!(Intent::from_axis(-127), Intent::Up);
        assert_eq!(Intent::from_axis(0), Intent::Hold);
        assert_eq!(Intent::from_axis(1), Intent::Down);
        assert_eq!(Intent::from_axis(127), Intent::Down);
    }

    #[test]
    fn test_intent_toward_touch_point() {
        let paddle = Paddle::new(10.0, 200.0, 10.0, 70.0, 8.0);

        // Finger well above the paddle
        assert_eq!(Intent::toward(50.0, &paddle), Intent::Up);
        // Finger well below
        assert_eq!(Intent::toward(400.0, &paddle), Intent::Down);
        // Finger on the paddle center, inside the 10 unit band
        assert_eq!(Intent::toward(235.0, &paddle), Intent::Hold);
        assert_eq!(Intent::toward(244.0, &paddle), Intent::Hold);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.bounds, Bounds::new(800.0, 500.0));
        assert_eq!(config.paddle_x(Side::Left, &config.bounds), 10.0);
        assert_eq!(config.paddle_x(Side::Right, &config.bounds), 780.0);
    }

    #[test]
    fn test_config_rejects_non_finite_fields() {
        let config = Config {
            aim_error: f32::INFINITY,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange("aim_error")));

        let config = Config {
            paddle_speed: f32::NAN,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange("paddle_speed"))
        );

        let config = Config {
            bounce_spread: f32::NAN,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_errors() {
        let config = Config {
            bounds: Bounds::new(0.0, 500.0),
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidBounds));

        let config = Config {
            winning_score: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange("winning_score"))
        );

        let config = Config {
            paddle_height: 900.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(
            ConfigError::OutOfRange("paddle_height").to_string(),
            "config field `paddle_height` is out of range"
        );
    }

    #[test]
    fn test_opponent_speed_progression() {
        let config = Config::default();
        assert_eq!(config.opponent_speed(1), 3.0);
        assert_eq!(config.opponent_speed(2), 3.5);
        assert_eq!(config.opponent_speed(5), 5.0);
        assert_eq!(config.opponent_speed(9), 7.0);
        assert_eq!(config.opponent_speed(40), 7.0); // Capped
    }

    #[test]
    fn test_stinger_note_counts() {
        assert_eq!(SoundCue::Win.notes(), 4);
        assert_eq!(SoundCue::Lose.notes(), 3);
        assert_eq!(SoundCue::WallHit.notes(), 1);
    }

    #[test]
    fn test_paddle_max_y() {
        let paddle = Paddle::new(10.0, 0.0, 10.0, 70.0, 8.0);
        assert_eq!(paddle.max_y(&Bounds::new(800.0, 500.0)), 430.0);
        // Field shorter than the paddle collapses the range to zero
        assert_eq!(paddle.max_y(&Bounds::new(800.0, 50.0)), 0.0);
    }
}
