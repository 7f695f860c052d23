//! # crawlship-common
//!
//! Shared types, error definitions, constants, and the release
//! configuration loader used across the crawlship workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
