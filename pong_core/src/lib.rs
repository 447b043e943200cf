//! Pong core game engine - paddle ball simulation with a scripted
//! opponent, level progression and a local two-player mode.

pub mod game;
pub mod opponent;
pub mod physics;
pub mod profile;
pub mod scheduler;
pub mod scoring;
pub mod types;

// WASM bridge module - only compiled when wasm feature is enabled
#[cfg(feature = "wasm")]
pub mod wasm;

pub use game::Game;
pub use opponent::OpponentParams;
pub use profile::DifficultyProfile;
pub use types::*;
