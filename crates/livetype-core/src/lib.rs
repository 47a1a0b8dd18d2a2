//! Core livetype library (document regions, typing engine, playback runtime, config).

pub mod config;
pub mod document;
pub mod engine;
pub mod logging;
pub mod runtime;
