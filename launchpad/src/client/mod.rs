//! Terminal client for the deploy page

pub mod remote;
pub mod render;
