//! Release configuration: maps deploy targets to image names and versions.
//!
//! The configuration lives in a `scrapinghub.yml` file at the project root:
//!
//! ```yaml
//! projects:
//!   default: 12345
//!   dev: 67890
//! image: true
//! images:
//!   dev: registry.example.com/team/dev-image
//! version: AUTO
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_REGISTRY, VERSION_AUTO, VERSION_GIT,
};
use crate::error::{CrawlshipError, Result};
use crate::types::ImageRef;

/// Platform project identifier a target deploys to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    /// Numeric project id, the usual form.
    Number(u64),
    /// Free-form id kept verbatim.
    Text(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Global `image` setting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum ImageSetting {
    Enabled(bool),
    Name(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    projects: BTreeMap<String, ProjectId>,
    #[serde(default)]
    image: Option<ImageSetting>,
    #[serde(default)]
    images: BTreeMap<String, String>,
    #[serde(default)]
    version: Option<serde_yaml::Value>,
}

/// Loaded release configuration.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Directory holding the configuration file; `git` runs here.
    root: PathBuf,
    projects: BTreeMap<String, ProjectId>,
    image: Option<ImageSetting>,
    images: BTreeMap<String, String>,
    version: String,
}

impl ReleaseConfig {
    /// Loads the configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading release config");
        let content = std::fs::read_to_string(path).map_err(|e| CrawlshipError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let root = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self::parse(&content, root).map_err(|e| CrawlshipError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parses configuration text, treating `root` as the project directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration document.
    pub fn from_yaml(content: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        Self::parse(content, root.clone()).map_err(|e| CrawlshipError::Parse {
            path: root.join(CONFIG_FILE_NAME),
            source: e,
        })
    }

    fn parse(content: &str, root: PathBuf) -> std::result::Result<Self, serde_yaml::Error> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        let version = match raw.version {
            Some(serde_yaml::Value::String(s)) => s,
            Some(serde_yaml::Value::Number(n)) => n.to_string(),
            _ => VERSION_AUTO.to_string(),
        };
        Ok(Self {
            root,
            projects: raw.projects,
            image: raw.image,
            images: raw.images,
            version,
        })
    }

    /// Returns configured targets and their project ids, sorted by name.
    #[must_use]
    pub fn targets(&self) -> Vec<(&str, &ProjectId)> {
        self.projects.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    /// Returns the project id a target deploys to.
    #[must_use]
    pub fn project_id(&self, target: &str) -> Option<&ProjectId> {
        self.projects.get(target)
    }

    /// Resolves the image repository configured for `target`.
    ///
    /// A per-target entry under `images` wins over the global `image`
    /// setting. `image: true` selects the default platform registry image
    /// of the target's project.
    ///
    /// # Errors
    ///
    /// Returns an error if no image is configured for the target, or if the
    /// default registry image is requested for an unknown target.
    pub fn get_image(&self, target: &str) -> Result<String> {
        if let Some(image) = self.images.get(target) {
            return Ok(image.clone());
        }
        match &self.image {
            Some(ImageSetting::Name(name)) => Ok(name.clone()),
            Some(ImageSetting::Enabled(true)) => {
                let project = self.project_id(target).ok_or_else(|| CrawlshipError::NotFound {
                    kind: "target",
                    id: target.to_string(),
                })?;
                Ok(format!("{DEFAULT_REGISTRY}/project/{project}"))
            }
            Some(ImageSetting::Enabled(false)) | None => Err(CrawlshipError::Config {
                message: format!("image is not configured for target \"{target}\""),
            }),
        }
    }

    /// Returns the configured version setting as written in the file.
    #[must_use]
    pub fn version_setting(&self) -> &str {
        &self.version
    }

    /// Resolves the release version.
    ///
    /// `GIT` requires `git describe` to succeed; `AUTO` falls back to the
    /// current Unix timestamp; anything else is used literally.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is `GIT` and no revision can be
    /// described.
    pub fn get_version(&self) -> Result<String> {
        match self.version.as_str() {
            VERSION_GIT => git_describe(&self.root).ok_or_else(|| CrawlshipError::Config {
                message: format!(
                    "version is set to {VERSION_GIT} but no git revision found in {}",
                    self.root.display()
                ),
            }),
            VERSION_AUTO => Ok(git_describe(&self.root)
                .unwrap_or_else(|| chrono::Utc::now().timestamp().to_string())),
            literal => Ok(literal.to_string()),
        }
    }
}

fn git_describe(dir: &Path) -> Option<String> {
    let output = std::process::Command::new("git")
        .args(["describe", "--always"])
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        tracing::debug!(dir = %dir.display(), "git describe failed");
        return None;
    }
    let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!rev.is_empty()).then_some(rev)
}

/// Builds the image reference for a repository and a tag.
///
/// A tag already present on the last path component is replaced; a registry
/// port such as `host:5000/name` is left alone. An image without any path
/// component is a bare name, so in `localhost:5000` the `5000` is read as a
/// tag and replaced; registry images always carry a repository path.
///
/// # Errors
///
/// Returns an error if `tag` is empty.
pub fn format_image_name(image: &str, tag: &str) -> Result<ImageRef> {
    let (prefix, last) = match image.rsplit_once('/') {
        Some((prefix, last)) => (Some(prefix), last),
        None => (None, image),
    };
    let name = match last.rsplit_once(':') {
        Some((name, existing)) => {
            tracing::warn!(image, tag = existing, "image already tagged, use --version to set the tag");
            name
        }
        None => last,
    };
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(CrawlshipError::Config {
            message: "tag is missing".into(),
        });
    }
    let repository = prefix.map_or_else(|| name.to_string(), |p| format!("{p}/{name}"));
    Ok(ImageRef::new(repository, tag))
}

/// Walks from `start` up to the filesystem root looking for the config file.
#[must_use]
pub fn discover(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Determines which configuration file to load.
///
/// Preference order: `explicit`, then the `CRAWLSHIP_CONFIG` environment
/// variable, then discovery from the current directory.
///
/// # Errors
///
/// Returns an error if no configuration file can be found.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    let cwd = std::env::current_dir().map_err(|e| CrawlshipError::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    discover(&cwd).ok_or_else(|| CrawlshipError::Config {
        message: format!("no {CONFIG_FILE_NAME} found in {} or its parents", cwd.display()),
    })
}

/// Locates and loads the release configuration.
///
/// # Errors
///
/// Returns an error if the file cannot be located, read, or parsed.
pub fn load_release_config(explicit: Option<&Path>) -> Result<ReleaseConfig> {
    let path = locate(explicit)?;
    ReleaseConfig::load(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
projects:
  default: 12345
  dev: 67890
image: true
images:
  dev: registry.example.com/team/dev-image
version: '1.0'
";

    fn sample() -> ReleaseConfig {
        ReleaseConfig::from_yaml(SAMPLE, "/tmp").unwrap()
    }

    #[test]
    fn targets_are_sorted() {
        let cfg = sample();
        let names: Vec<_> = cfg.targets().into_iter().map(|(t, _)| t).collect();
        assert_eq!(names, vec!["default", "dev"]);
    }

    #[test]
    fn default_image_uses_platform_registry() {
        let cfg = sample();
        assert_eq!(
            cfg.get_image("default").unwrap(),
            "images.scrapinghub.com/project/12345"
        );
    }

    #[test]
    fn per_target_image_overrides_global_setting() {
        let cfg = sample();
        assert_eq!(
            cfg.get_image("dev").unwrap(),
            "registry.example.com/team/dev-image"
        );
    }

    #[test]
    fn unknown_target_with_default_image_is_not_found() {
        let cfg = sample();
        let err = cfg.get_image("prod").unwrap_err();
        assert!(matches!(err, CrawlshipError::NotFound { kind: "target", .. }));
    }

    #[test]
    fn named_global_image_applies_to_every_target() {
        let cfg = ReleaseConfig::from_yaml("image: my/crawler\n", "/tmp").unwrap();
        assert_eq!(cfg.get_image("anything").unwrap(), "my/crawler");
    }

    #[test]
    fn missing_image_setting_is_a_config_error() {
        let cfg = ReleaseConfig::from_yaml("projects:\n  default: 1\n", "/tmp").unwrap();
        assert!(matches!(
            cfg.get_image("default").unwrap_err(),
            CrawlshipError::Config { .. }
        ));
        let cfg = ReleaseConfig::from_yaml("image: false\n", "/tmp").unwrap();
        assert!(cfg.get_image("default").is_err());
    }

    #[test]
    fn literal_version_is_returned_verbatim() {
        assert_eq!(sample().get_version().unwrap(), "1.0");
    }

    #[test]
    fn numeric_version_is_stringified() {
        let cfg = ReleaseConfig::from_yaml("version: 7\n", "/tmp").unwrap();
        assert_eq!(cfg.get_version().unwrap(), "7");
    }

    #[test]
    fn auto_version_falls_back_to_timestamp_outside_git() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = ReleaseConfig::from_yaml("", dir.path()).unwrap();
        assert_eq!(cfg.version_setting(), "AUTO");
        let version = cfg.get_version().unwrap();
        assert!(!version.is_empty());
    }

    #[test]
    fn git_version_outside_a_repository_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = ReleaseConfig::from_yaml("version: GIT\n", dir.path()).unwrap();
        assert_eq!(cfg.version_setting(), "GIT");
        assert!(matches!(
            cfg.get_version().unwrap_err(),
            CrawlshipError::Config { .. }
        ));
    }

    #[test]
    fn string_project_ids_are_kept() {
        let cfg = ReleaseConfig::from_yaml("projects:\n  default: abc\nimage: true\n", "/tmp")
            .unwrap();
        assert_eq!(
            cfg.get_image("default").unwrap(),
            "images.scrapinghub.com/project/abc"
        );
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = ReleaseConfig::from_yaml("projects: [", "/tmp").unwrap_err();
        assert!(matches!(err, CrawlshipError::Parse { .. }));
    }

    #[test]
    fn format_image_name_appends_tag() {
        let image = format_image_name("my/crawler", "1.0").unwrap();
        assert_eq!(image.to_string(), "my/crawler:1.0");
    }

    #[test]
    fn format_image_name_replaces_existing_tag() {
        let image = format_image_name("my/crawler:old", "new").unwrap();
        assert_eq!(image.to_string(), "my/crawler:new");
    }

    #[test]
    fn format_image_name_keeps_registry_port() {
        let image = format_image_name("localhost:5000/crawler", "2").unwrap();
        assert_eq!(image.repository(), "localhost:5000/crawler");
        assert_eq!(image.tag(), "2");
    }

    #[test]
    fn format_image_name_reads_bare_host_port_as_tag() {
        let image = format_image_name("localhost:5000", "3").unwrap();
        assert_eq!(image.to_string(), "localhost:3");
    }

    #[test]
    fn format_image_name_requires_tag() {
        assert!(format_image_name("crawler", "  ").is_err());
    }

    #[test]
    fn discover_finds_config_in_parent_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("mkdir");
        let config = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config, SAMPLE).expect("write");
        assert_eq!(discover(&nested), Some(config));
    }

    #[test]
    fn load_reads_file_and_sets_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, SAMPLE).expect("write");
        let cfg = load_release_config(Some(&path)).unwrap();
        assert_eq!(cfg.project_id("dev"), Some(&ProjectId::Number(67890)));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ReleaseConfig::load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, CrawlshipError::Io { .. }));
    }
}
