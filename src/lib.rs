//! Fancount library
//!
//! Exposes the modules that make up the follower-count tracker so both the
//! binary and integration tests can use them.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod interval;
pub mod policy;
pub mod resolve;
pub mod state;
pub mod tracker;
