pub mod config;
pub mod engine;
pub mod service;
pub mod tui;
