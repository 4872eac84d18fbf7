//! Upstream API models

pub mod models;
