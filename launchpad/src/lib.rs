//! Launchpad Library
//!
//! OAuth sign-in for onboarding visitors, Launch project initiation, and
//! deployment progress tracking.

pub mod app;
pub mod authn;
pub mod client;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod server;
pub mod session;
pub mod storage;
pub mod utils;
pub mod workers;
