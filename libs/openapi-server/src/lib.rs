//! Launchpad server API models

pub mod models;
