//! Runs the full contract against an image.

use crawlship_common::types::ImageRef;
use crawlship_runtime::backend::ContainerRuntime;

use crate::check::Check;
use crate::error::Result;

/// Summary of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Image that was validated.
    pub image: ImageRef,
    /// Checks that passed, in execution order.
    pub passed: Vec<Check>,
}

/// Validates `image` against every check in [`Check::ALL`].
///
/// Checks run one after another; the first failure stops the run and is
/// returned as is, so later checks never execute.
///
/// # Errors
///
/// Returns the first failing check's error.
pub fn validate(runtime: &dyn ContainerRuntime, image: &ImageRef) -> Result<ValidationReport> {
    tracing::info!(image = %image, "validating image contract");
    validate_with(runtime, image, |_| {})
}

/// Like [`validate`], calling `on_pass` after each check that passes.
///
/// # Errors
///
/// Returns the first failing check's error.
pub fn validate_with(
    runtime: &dyn ContainerRuntime,
    image: &ImageRef,
    mut on_pass: impl FnMut(Check),
) -> Result<ValidationReport> {
    let mut passed = Vec::with_capacity(Check::ALL.len());
    for check in Check::ALL {
        if let Err(e) = check.run(runtime, image) {
            tracing::debug!(check = %check, error = %e, "check failed");
            return Err(e);
        }
        on_pass(check);
        passed.push(check);
    }
    Ok(ValidationReport {
        image: image.clone(),
        passed,
    })
}
