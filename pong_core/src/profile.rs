//! Difficulty tuning per play context (desktop keyboard vs touch screen).

use crate::types::ConfigError;

/// Tunable constants selected once at session start.
///
/// Touch play gets a slower, gentler ball and an opponent that misreads
/// the ball and hesitates, less so at higher levels. Desktop play keeps a
/// faster ball and an opponent that tracks exactly within a fixed band.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifficultyProfile {
    /// Ball speed at serve
    pub base_ball_speed: f32,
    /// Speed multiplier on every paddle hit
    pub speed_growth: f32,
    /// Opponent error chance at level 1
    pub error_chance_start: f32,
    /// Error chance removed per level
    pub error_chance_step: f32,
    pub error_chance_floor: f32,
    /// Opponent dead zone at level 1
    pub dead_zone_start: f32,
    /// Dead zone removed per level
    pub dead_zone_step: f32,
    pub dead_zone_floor: f32,
}

impl DifficultyProfile {
    pub fn desktop() -> Self {
        DifficultyProfile {
            base_ball_speed: 5.0,
            speed_growth: 1.05,
            error_chance_start: 0.0,
            error_chance_step: 0.0,
            error_chance_floor: 0.0,
            dead_zone_start: 35.0,
            dead_zone_step: 0.0,
            dead_zone_floor: 35.0,
        }
    }

    pub fn touch() -> Self {
        DifficultyProfile {
            base_ball_speed: 4.0,
            speed_growth: 1.03,
            error_chance_start: 0.30,
            error_chance_step: 0.05,
            error_chance_floor: 0.05,
            dead_zone_start: 50.0,
            dead_zone_step: 5.0,
            dead_zone_floor: 20.0,
        }
    }

    /// Pick a profile from a "touch capable" flag
    pub fn for_context(touch: bool) -> Self {
        if touch {
            Self::touch()
        } else {
            Self::desktop()
        }
    }

    /// Probability the opponent misjudges the ball at `level`
    pub fn error_chance(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.error_chance_start - steps * self.error_chance_step).max(self.error_chance_floor)
    }

    /// Tolerance band around the opponent's target at `level`
    pub fn dead_zone(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.dead_zone_start - steps * self.dead_zone_step).max(self.dead_zone_floor)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_ball_speed.is_finite() || self.base_ball_speed <= 0.0 {
            return Err(ConfigError::OutOfRange("base_ball_speed"));
        }
        if !self.speed_growth.is_finite() || self.speed_growth < 1.0 {
            return Err(ConfigError::OutOfRange("speed_growth"));
        }
        let chances = [
            self.error_chance_start,
            self.error_chance_step,
            self.error_chance_floor,
        ];
        if chances.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(ConfigError::OutOfRange("error_chance"));
        }
        let zones = [self.dead_zone_start, self.dead_zone_step, self.dead_zone_floor];
        if zones.iter().any(|z| !z.is_finite() || *z < 0.0) {
            return Err(ConfigError::OutOfRange("dead_zone"));
        }
        Ok(())
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::desktop()
    }
}
