//! Service layer for the keyboard engine.
//!
//! This module contains the dwell-activation controller, the layout packer,
//! and key geometry. None of them touch global state; settings arrive as
//! arguments.

pub mod dwell;
pub mod geometry;
pub mod packer;

// Re-export commonly used types and functions
pub use dwell::{Commit, DwellController};
pub use geometry::{compute_key_size, GridShape, SpacingParams, Viewport};
pub use packer::{pack, pack_rows, regular_keys};
