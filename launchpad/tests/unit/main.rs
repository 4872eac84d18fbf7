//! Launchpad integration tests

mod test_fsm;
mod test_server;
