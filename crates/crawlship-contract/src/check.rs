//! The individual contract checks.

use std::fmt;

use crawlship_common::constants::{
    ENTRYPOINT_PACKAGE, ENTRYPOINT_PACKAGE_WARNING, IMAGE_MISSING_MESSAGE, LIST_SPIDERS_ENTRY,
    LIST_SPIDERS_MISSING_MESSAGE, START_CRAWL_ENTRY, start_crawl_missing_message,
};
use crawlship_common::types::ImageRef;
use crawlship_runtime::backend::ContainerRuntime;
use crawlship_runtime::error::RuntimeError;
use crawlship_runtime::exec::run_in_image;

use crate::error::{ContractError, Result};

/// One requirement the platform places on an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// The image is present in the local runtime.
    ImageExists,
    /// `start-crawl` is on the image's `PATH`.
    StartCrawlEntry,
    /// `list-spiders` is on the image's `PATH`.
    ListSpidersEntry,
    /// The entry point package is installed.
    EntrypointPackage,
}

impl Check {
    /// All checks, in the order they run.
    pub const ALL: [Self; 4] = [
        Self::ImageExists,
        Self::StartCrawlEntry,
        Self::ListSpidersEntry,
        Self::EntrypointPackage,
    ];

    /// Short human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ImageExists => "image exists locally",
            Self::StartCrawlEntry => "start-crawl entry point",
            Self::ListSpidersEntry => "list-spiders entry point",
            Self::EntrypointPackage => "scrapinghub-entrypoint-scrapy package",
        }
    }

    /// Command run inside the image, or `None` for the existence check.
    #[must_use]
    pub const fn command(self) -> Option<&'static [&'static str]> {
        match self {
            Self::ImageExists => None,
            Self::StartCrawlEntry => Some(&["which", START_CRAWL_ENTRY]),
            Self::ListSpidersEntry => Some(&["which", LIST_SPIDERS_ENTRY]),
            Self::EntrypointPackage => Some(&["pip", "show", ENTRYPOINT_PACKAGE]),
        }
    }

    fn failure_message(self) -> String {
        match self {
            Self::ImageExists => IMAGE_MISSING_MESSAGE.to_string(),
            Self::StartCrawlEntry => start_crawl_missing_message(),
            Self::ListSpidersEntry => LIST_SPIDERS_MISSING_MESSAGE.to_string(),
            Self::EntrypointPackage => ENTRYPOINT_PACKAGE_WARNING.to_string(),
        }
    }

    fn not_found(self) -> ContractError {
        ContractError::NotFound {
            check: self,
            message: self.failure_message(),
        }
    }

    /// Runs this check against `image`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] if the image violates this part
    /// of the contract, or [`ContractError::Runtime`] if the runtime fails
    /// for any other reason.
    pub fn run(self, runtime: &dyn ContainerRuntime, image: &ImageRef) -> Result<()> {
        tracing::debug!(check = %self, image = %image, "running check");
        let Some(command) = self.command() else {
            return check_image_exists(runtime, image);
        };
        let output = run_in_image(runtime, image, command)?;
        if output.succeeded_with_output() {
            Ok(())
        } else {
            Err(self.not_found())
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

fn check_image_exists(runtime: &dyn ContainerRuntime, image: &ImageRef) -> Result<()> {
    match runtime.inspect_image(image) {
        Ok(meta) => {
            tracing::debug!(image = %image, id = %meta.id, "image found");
            Ok(())
        }
        Err(RuntimeError::ImageNotFound { image: missing }) => {
            tracing::debug!(image = %missing, "image not found");
            Err(Check::ImageExists.not_found())
        }
        Err(other) => Err(other.into()),
    }
}
