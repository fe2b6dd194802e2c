//! Infrastructure adapters for config, processes, prompts, and the terminal.

pub mod config;
pub mod logging;
pub mod picker;
pub mod process;
pub mod prompt;
pub mod workdir;
