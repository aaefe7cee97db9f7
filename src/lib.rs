//! Arcade Snake: a grid-based snake engine driven by a host timer, plus a
//! terminal renderer and a persisted best score.

pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod timer;
pub mod ui;
