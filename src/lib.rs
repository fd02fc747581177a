//! Dwellboard Library
//!
//! This library provides the core of the Dwellboard on-screen keyboard:
//! the dwell controller that turns press/release signals into text, the
//! layout packer, settings and preset persistence, speech and haptic
//! feedback backends, and the terminal front end.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod feedback;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
pub mod tui;
