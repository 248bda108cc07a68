//! Color rotation subsystem.
//!
//! ```text
//! GET /random-color → RotationEngine::next_color
//!     read cursor → palette[cursor] → write (cursor + 1) mod L
//!     → increment count → read table
//!
//! GET /color-stats  → RotationEngine::stats (read table only)
//! ```

pub mod engine;
pub mod types;

pub use engine::{RotationEngine, RotationMode};
pub use types::{ColorCount, ColorStats, Palette, Rotation, DEFAULT_PALETTE};
