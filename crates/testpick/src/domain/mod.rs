//! Domain types shared by the resolver pipeline.

pub mod errors;
pub mod model;
