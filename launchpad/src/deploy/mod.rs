//! Deployment module

pub mod fsm;
pub mod launcher;
pub mod progress;
