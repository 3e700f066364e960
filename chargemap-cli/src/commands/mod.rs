//! CLI command implementations.

pub mod cluster;
pub mod common;
pub mod config;
pub mod nearby;
pub mod output;
pub mod search;
