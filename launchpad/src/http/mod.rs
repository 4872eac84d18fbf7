//! HTTP clients for upstream APIs

pub mod client;
pub mod launch;
