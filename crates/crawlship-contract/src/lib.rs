//! # crawlship-contract
//!
//! Validates that a locally built image can be run by the crawl platform:
//! the image must exist, expose the `start-crawl` and `list-spiders` entry
//! points, and ship the package that provides them.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod check;
pub mod error;
pub mod validator;
