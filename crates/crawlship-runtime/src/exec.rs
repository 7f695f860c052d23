//! Running one short-lived command inside an image.

use crawlship_common::types::{ContainerId, ImageRef};

use crate::backend::{ContainerRuntime, LogOptions};
use crate::error::Result;

/// Result of a command run in a throwaway container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit status reported by the runtime.
    pub exit_code: i64,
    /// Captured output: stdout, plus stderr when the command failed.
    pub logs: String,
}

impl ExecOutput {
    /// Returns whether the command exited cleanly and printed something.
    #[must_use]
    pub fn succeeded_with_output(&self) -> bool {
        self.exit_code == 0 && !self.logs.trim().is_empty()
    }
}

/// Runs `command` in a fresh container from `image` and waits for it.
///
/// The container is created, started, waited on, and its logs read. Stderr
/// is only collected when the exit status is non-zero. The container is
/// removed afterwards, also when starting or waiting on it failed; a failed
/// removal is logged and otherwise ignored.
///
/// # Errors
///
/// Returns an error if any create, start, wait, or logs call fails.
pub fn run_in_image(
    runtime: &dyn ContainerRuntime,
    image: &ImageRef,
    command: &[&str],
) -> Result<ExecOutput> {
    let command: Vec<String> = command.iter().map(|s| (*s).to_string()).collect();
    let id = runtime.create_container(image, &command)?;
    let result = collect_output(runtime, &id);

    if let Err(e) = runtime.remove(&id) {
        tracing::warn!(id = %id, error = %e, "failed to remove check container");
    }

    let output = result?;
    tracing::debug!(image = %image, cmd = ?command, exit_code = output.exit_code, "{}", output.logs);
    Ok(output)
}

fn collect_output(runtime: &dyn ContainerRuntime, id: &ContainerId) -> Result<ExecOutput> {
    runtime.start(id)?;
    let exit_code = runtime.wait(id)?;
    let logs = runtime.logs(
        id,
        LogOptions {
            stdout: true,
            stderr: exit_code != 0,
            timestamps: false,
        },
    )?;
    Ok(ExecOutput { exit_code, logs })
}
