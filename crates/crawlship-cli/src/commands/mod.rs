//! CLI command definitions and dispatch.


use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crawlship_common::constants::CONFIG_ENV_VAR;

/// crawlship — check crawler images against the crawl platform contract.
#[derive(Parser, Debug)]
#[command(name = "crawlship", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to the release configuration (defaults to the nearest scrapinghub.yml).
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Returns whether debug logging was requested.
    pub const fn debug(&self) -> bool {
        match &self.command {
            Command::Test(args) => args.debug,
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Test a built image with the crawl platform contract.
    Test(image_test::TestArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Test(args) => image_test::execute(&args, cli.config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("crawlship").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_to_default_target() {
        let cli = parse(&["test"]);
        let Command::Test(args) = cli.command;
        assert_eq!(args.target, "default");
        assert!(!args.debug);
        assert!(!args.list_targets);
        assert_eq!(args.release_version, None);
    }

    #[test]
    fn test_accepts_target_and_flags() {
        let cli = parse(&["test", "dev", "-d", "--version", "1.2"]);
        assert!(cli.debug());
        let Command::Test(args) = cli.command;
        assert_eq!(args.target, "dev");
        assert_eq!(args.release_version.as_deref(), Some("1.2"));
    }

    #[test]
    fn list_targets_has_short_form() {
        let cli = parse(&["test", "-l"]);
        let Command::Test(args) = cli.command;
        assert!(args.list_targets);
    }

    #[test]
    fn config_is_global() {
        let cli = parse(&["test", "--config", "/tmp/scrapinghub.yml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/scrapinghub.yml")));
    }

    #[test]
    fn top_level_version_flag_is_kept() {
        let err = Cli::try_parse_from(["crawlship", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
