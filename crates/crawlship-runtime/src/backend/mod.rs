//! Container runtime abstraction.

pub mod docker;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use crawlship_common::types::{ContainerId, ImageRef};
use serde::Deserialize;

use crate::error::Result;

/// Which streams to collect when reading container logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// Include standard output.
    pub stdout: bool,
    /// Include standard error.
    pub stderr: bool,
    /// Prefix each line with its timestamp.
    pub timestamps: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            stdout: true,
            stderr: false,
            timestamps: false,
        }
    }
}

/// Image metadata as reported by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageMetadata {
    /// Content-addressed image id.
    pub id: String,
    /// Repository tags pointing at the image.
    #[serde(default)]
    pub repo_tags: Vec<String>,
    /// Creation timestamp as reported by the runtime.
    #[serde(default)]
    pub created: String,
    /// Image size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Client for a local container runtime.
///
/// Each call blocks until the runtime has answered. Implementors only need
/// to support sequential use.
pub trait ContainerRuntime: Send + Sync {
    /// Returns metadata for a locally available image.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RuntimeError::ImageNotFound`] if the image is
    /// not present, or another error if the runtime cannot answer.
    fn inspect_image(&self, image: &ImageRef) -> Result<ImageMetadata>;

    /// Creates a stopped container that will run `command` in `image`.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be created.
    fn create_container(&self, image: &ImageRef, command: &[String]) -> Result<ContainerId>;

    /// Starts a created container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be started.
    fn start(&self, id: &ContainerId) -> Result<()>;

    /// Blocks until the container exits and returns its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot report the status.
    fn wait(&self, id: &ContainerId) -> Result<i64>;

    /// Returns the captured output of a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs cannot be retrieved.
    fn logs(&self, id: &ContainerId, options: LogOptions) -> Result<String>;

    /// Removes a stopped container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be removed.
    fn remove(&self, id: &ContainerId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_options_capture_stdout_only() {
        let opts = LogOptions::default();
        assert!(opts.stdout);
        assert!(!opts.stderr);
        assert!(!opts.timestamps);
    }

    #[test]
    fn image_metadata_decodes_inspect_fields() {
        let json = r#"{"Id":"sha256:abc","RepoTags":["crawler:1"],"Created":"2024-01-01T00:00:00Z","Size":42,"Config":{}}"#;
        let meta: ImageMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.id, "sha256:abc");
        assert_eq!(meta.repo_tags, vec!["crawler:1"]);
        assert_eq!(meta.size, 42);
    }
}
