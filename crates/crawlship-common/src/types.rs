//! Domain primitive types used across the crawlship workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::CHECK_CONTAINER_PREFIX;

/// Identifier of a container created by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates a unique name for a throwaway check container.
#[must_use]
pub fn check_container_name() -> String {
    format!("{CHECK_CONTAINER_PREFIX}-{}", uuid::Uuid::new_v4())
}

/// Fully qualified image reference: repository plus tag.
///
/// Immutable once built; use [`crate::config::format_image_name`] to
/// construct one from a configured image and a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    repository: String,
    tag: String,
}

impl ImageRef {
    /// Creates a reference from an untagged repository and a tag.
    #[must_use]
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Returns the repository part, e.g. `images.scrapinghub.com/project/1`.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the tag part.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_ref_displays_repository_and_tag() {
        let image = ImageRef::new("registry.local:5000/team/app", "1.2");
        assert_eq!(image.to_string(), "registry.local:5000/team/app:1.2");
        assert_eq!(image.repository(), "registry.local:5000/team/app");
        assert_eq!(image.tag(), "1.2");
    }

    #[test]
    fn check_container_names_are_unique_and_prefixed() {
        let a = check_container_name();
        let b = check_container_name();
        assert!(a.starts_with("crawlship-check-"));
        assert_ne!(a, b);
    }
}
