// Library interface for testmate-cli so integration tests can reach the
// command parser and history rendering.

pub mod app;
pub mod commands;
pub mod render;

pub use commands::{handle_command, CommandResult};
