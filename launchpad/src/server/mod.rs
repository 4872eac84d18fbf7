//! Local HTTP server

pub mod errors;
pub mod handlers;
pub mod serve;
pub mod state;
