//! bids-tasks CLI library, exposed for unit tests.

pub mod app;
pub mod commands;
pub mod utils;
