//! Score keeping, win checks and level progression.

use crate::types::*;

/// Outcome of a winner check
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nobody has won yet, keep rallying
    Continue,
    /// Single-player level finished; `level` is the level now in effect
    LevelCleared { level: u32 },
    /// Match decided
    GameOver(Side),
}

/// Points, level and rally phase for one session
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: Score,
    pub level: u32,
    pub phase: Phase,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Scoreboard {
            score: Score::default(),
            level: 1,
            phase: Phase::Rallying,
        }
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one point to `scorer` and enter the post-score phase
    pub fn record_point(&mut self, scorer: Side) -> Score {
        match scorer {
            Side::Left => self.score.left += 1,
            Side::Right => self.score.right += 1,
        }
        self.phase = Phase::PointScored;
        self.score
    }

    /// Decide whether the last point ended the level or the match.
    ///
    /// In single-player the left side clearing `winning_score` advances the
    /// level; the opponent reaching it ends the match. In two-player either
    /// side reaching it wins and levels do not apply.
    pub fn check_winner(&mut self, mode: GameMode, winning_score: u32) -> Verdict {
        let left_won = self.score.left >= winning_score;
        let right_won = self.score.right >= winning_score;

        let verdict = match mode {
            GameMode::SinglePlayer if left_won => {
                self.level += 1;
                Verdict::LevelCleared { level: self.level }
            }
            _ if left_won => Verdict::GameOver(Side::Left),
            _ if right_won => Verdict::GameOver(Side::Right),
            _ => Verdict::Continue,
        };

        match verdict {
            Verdict::Continue => {}
            Verdict::LevelCleared { .. } => self.phase = Phase::LevelCleared,
            Verdict::GameOver(winner) => self.phase = Phase::GameOver(winner),
        }
        verdict
    }

    /// Grace window over, back to play
    pub fn resume_rally(&mut self) {
        if self.phase == Phase::PointScored {
            self.phase = Phase::Rallying;
        }
    }

    /// Clear points for the next level; level persists
    pub fn reset_points(&mut self) {
        self.score = Score::default();
        self.phase = Phase::Rallying;
    }

    /// Back to level 1 with no points
    pub fn reset_all(&mut self) {
        *self = Self::new();
    }
}
