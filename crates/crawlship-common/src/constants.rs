//! Platform contract constants and default names.

/// Name of the release configuration file searched for in the project tree.
pub const CONFIG_FILE_NAME: &str = "scrapinghub.yml";

/// Environment variable that overrides release configuration discovery.
pub const CONFIG_ENV_VAR: &str = "CRAWLSHIP_CONFIG";

/// Environment variable that overrides the `docker` executable location.
pub const DOCKER_BIN_ENV_VAR: &str = "DOCKER_BIN";

/// Default docker executable name looked up on `PATH`.
pub const DOCKER_BIN: &str = "docker";

/// Target used when none is given on the command line.
pub const DEFAULT_TARGET: &str = "default";

/// Registry host used when a target enables the default platform image.
pub const DEFAULT_REGISTRY: &str = "images.scrapinghub.com";

/// Version keyword resolving to `git describe`, falling back to a timestamp.
pub const VERSION_AUTO: &str = "AUTO";

/// Version keyword resolving strictly to `git describe`.
pub const VERSION_GIT: &str = "GIT";

/// Entry point the platform invokes to launch a crawl.
pub const START_CRAWL_ENTRY: &str = "start-crawl";

/// Entry point the platform invokes to enumerate spiders.
pub const LIST_SPIDERS_ENTRY: &str = "list-spiders";

/// Python package that provides both entry points.
pub const ENTRYPOINT_PACKAGE: &str = "scrapinghub-entrypoint-scrapy";

/// Prefix for the names of throwaway check containers.
pub const CHECK_CONTAINER_PREFIX: &str = "crawlship-check";

/// Reported when the image is absent from the local runtime.
pub const IMAGE_MISSING_MESSAGE: &str =
    "The image doesn't exist yet, please use build command at first.";

/// Advises adding the entry point package to the project.
pub const ENTRYPOINT_PACKAGE_WARNING: &str = "You should add scrapinghub-entrypoint-scrapy(>=0.7.0) dependency \
     to your requirements.txt or to Dockerfile to run the image with Scrapy Cloud.";

/// Reported when `list-spiders` cannot be located inside the image.
pub const LIST_SPIDERS_MISSING_MESSAGE: &str = "list-spiders command is not found in the image.\n\
     Please upgrade your scrapinghub-entrypoint-scrapy(>=0.7.0)";

/// Reported when `start-crawl` cannot be located inside the image.
#[must_use]
pub fn start_crawl_missing_message() -> String {
    format!("start-crawl command is not found in the image.\n{ENTRYPOINT_PACKAGE_WARNING}")
}

/// Binary name for the CLI.
pub const BIN_NAME: &str = "crawlship";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_warning_is_a_single_sentence_pair() {
        assert_eq!(
            ENTRYPOINT_PACKAGE_WARNING,
            "You should add scrapinghub-entrypoint-scrapy(>=0.7.0) dependency to your \
             requirements.txt or to Dockerfile to run the image with Scrapy Cloud."
        );
    }

    #[test]
    fn start_crawl_message_ends_with_package_warning() {
        let msg = start_crawl_missing_message();
        assert!(msg.starts_with("start-crawl command is not found in the image.\n"));
        assert!(msg.ends_with(ENTRYPOINT_PACKAGE_WARNING));
    }

    #[test]
    fn list_spiders_message_recommends_upgrade() {
        let (first, second) = LIST_SPIDERS_MISSING_MESSAGE
            .split_once('\n')
            .expect("two lines");
        assert_eq!(first, "list-spiders command is not found in the image.");
        assert_eq!(second, "Please upgrade your scrapinghub-entrypoint-scrapy(>=0.7.0)");
    }
}
