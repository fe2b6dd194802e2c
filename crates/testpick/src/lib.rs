pub mod app;
pub mod domain;
pub mod infra;
pub mod ui;

/// Install logging for the process. See [`infra::logging::init`].
pub fn init(level: &str) {
    infra::logging::init(level);
}
