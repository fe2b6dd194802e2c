//! Command-line front end.

pub mod app;
pub mod cli;
