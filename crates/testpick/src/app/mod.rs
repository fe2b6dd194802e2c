//! Application layer: the resolver pipeline and the services around it.

pub mod classify;
pub mod locate;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod runner;
pub mod scan;
pub mod selection;
pub mod session;
pub mod workflow;
