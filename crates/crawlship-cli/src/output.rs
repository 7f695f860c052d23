//! Formatted output helpers for CLI commands.
//!
//! Progress lines go to stderr with ANSI styling; machine-friendly
//! listings such as the target table go to stdout unstyled.

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Formats the header printed before validation starts.
#[must_use]
pub fn header_line(image: &str) -> String {
    format!("  {BOLD}Testing{RESET} {image} {DIM}(crawlship v{}){RESET}", env!("CARGO_PKG_VERSION"))
}

/// Formats the line reported for a passed check.
#[must_use]
pub fn pass_line(description: &str) -> String {
    format!("    {GREEN}✔{RESET} {description}")
}

/// Formats the closing line of a successful run.
#[must_use]
pub fn success_line(image: &str, checks: usize) -> String {
    format!("  {GREEN}{BOLD}{image}{RESET} passed {checks} check(s)")
}

/// Formats one row of the `--list-targets` listing.
#[must_use]
pub fn target_line(target: &str, project: &str) -> String {
    format!("{target}\t{project}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_line_is_tab_separated() {
        assert_eq!(target_line("dev", "67890"), "dev\t67890");
    }

    #[test]
    fn pass_line_contains_description() {
        let line = pass_line("start-crawl entry point");
        assert!(line.contains("start-crawl entry point"));
        assert!(line.contains('✔'));
    }

    #[test]
    fn success_line_reports_count() {
        assert!(success_line("crawler:1", 4).ends_with("passed 4 check(s)"));
    }

    #[test]
    fn header_mentions_image() {
        assert!(header_line("crawler:1").contains("crawler:1"));
    }
}
