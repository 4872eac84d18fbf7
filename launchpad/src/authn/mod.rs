//! Authentication

pub mod oauth;
