//! Application orchestration layer
//!
//! This module wires the engine, stores and feedback backends into a
//! running keyboard without containing rendering logic.

/// Terminal keyboard startup
pub mod launch;

/// Settings, presets, layout and dwell controller for one session
pub mod session;

// Re-export commonly used items for convenience
pub use launch::run_keyboard_terminal;
pub use session::KeyboardSession;
