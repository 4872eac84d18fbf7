//! Browser sessions

pub mod cookie;
pub mod store;
