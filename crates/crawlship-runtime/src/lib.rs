//! Container runtime client for crawlship.
//!
//! Exposes the [`backend::ContainerRuntime`] seam, the Docker CLI backend
//! behind it, and [`exec::run_in_image`], which runs one short-lived
//! command inside an image and captures its result.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod error;
pub mod exec;
