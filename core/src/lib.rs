//! BIDS filename decomposition and dataset queries, packaged as task nodes
//! with declarative input/output schemas.

pub mod api;
pub mod bids;
pub mod config;
pub mod error;
pub mod task;
