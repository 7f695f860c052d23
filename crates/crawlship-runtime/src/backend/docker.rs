//! Docker backend driving the `docker` command-line client.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crawlship_common::constants::{DOCKER_BIN, DOCKER_BIN_ENV_VAR};
use crawlship_common::types::{ContainerId, ImageRef, check_container_name};

use super::{ContainerRuntime, ImageMetadata, LogOptions};
use crate::error::{Result, RuntimeError};

/// Runtime client that shells out to the `docker` binary.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
}

impl DockerCli {
    /// Locates the `docker` binary and checks that the daemon answers.
    ///
    /// `DOCKER_BIN` overrides the lookup on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Unavailable`] if the binary is missing or the
    /// daemon does not respond.
    pub fn connect() -> Result<Self> {
        let binary = match std::env::var_os(DOCKER_BIN_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => which::which(DOCKER_BIN).map_err(|e| RuntimeError::Unavailable {
                reason: format!("{DOCKER_BIN} executable not found: {e}"),
            })?,
        };
        let client = Self::with_binary(binary);
        let version = client.server_version().map_err(|e| RuntimeError::Unavailable {
            reason: e.to_string(),
        })?;
        tracing::debug!(binary = %client.binary.display(), %version, "connected to docker");
        Ok(client)
    }

    /// Creates a client for an explicit binary without contacting the daemon.
    #[must_use]
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Returns the path of the `docker` binary in use.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Returns the daemon version string.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon cannot be reached.
    pub fn server_version(&self) -> Result<String> {
        let output = self.run("version", &["version", "--format", "{{.Server.Version}}"])?;
        Ok(stdout_line(&output))
    }

    fn run(&self, operation: &'static str, args: &[&str]) -> Result<Output> {
        tracing::trace!(operation, ?args, "invoking docker");
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| RuntimeError::Unavailable {
                reason: format!("failed to run {}: {e}", self.binary.display()),
            })?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(RuntimeError::Command {
                operation,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl ContainerRuntime for DockerCli {
    fn inspect_image(&self, image: &ImageRef) -> Result<ImageMetadata> {
        let reference = image.to_string();
        let output = self
            .run("image inspect", &["image", "inspect", reference.as_str()])
            .map_err(|e| match e {
                RuntimeError::Command { ref stderr, .. } if is_missing_image(stderr) => {
                    RuntimeError::ImageNotFound {
                        image: reference.clone(),
                    }
                }
                other => other,
            })?;
        parse_inspect(&output.stdout)
    }

    fn create_container(&self, image: &ImageRef, command: &[String]) -> Result<ContainerId> {
        let name = check_container_name();
        let reference = image.to_string();
        let mut args = vec!["create", "--name", name.as_str(), reference.as_str()];
        args.extend(command.iter().map(String::as_str));
        let output = self.run("create", &args)?;
        let id = stdout_line(&output);
        if id.is_empty() {
            return Err(RuntimeError::Decode {
                operation: "create",
                detail: "empty container id".into(),
            });
        }
        tracing::debug!(%id, %name, image = %image, "container created");
        Ok(ContainerId::new(id))
    }

    fn start(&self, id: &ContainerId) -> Result<()> {
        let _ = self.run("start", &["start", id.as_str()])?;
        Ok(())
    }

    fn wait(&self, id: &ContainerId) -> Result<i64> {
        let output = self.run("wait", &["wait", id.as_str()])?;
        parse_exit_status(&stdout_line(&output))
    }

    fn logs(&self, id: &ContainerId, options: LogOptions) -> Result<String> {
        let mut args = vec!["logs"];
        if options.timestamps {
            args.push("--timestamps");
        }
        args.push(id.as_str());
        let output = self.run("logs", &args)?;

        let mut logs = String::new();
        if options.stdout {
            logs.push_str(&String::from_utf8_lossy(&output.stdout));
        }
        if options.stderr {
            logs.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(logs)
    }

    fn remove(&self, id: &ContainerId) -> Result<()> {
        let _ = self.run("rm", &["rm", id.as_str()])?;
        Ok(())
    }
}

fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn is_missing_image(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no such image") || lower.contains("no such object")
}

fn parse_inspect(stdout: &[u8]) -> Result<ImageMetadata> {
    let mut images: Vec<ImageMetadata> =
        serde_json::from_slice(stdout).map_err(|e| RuntimeError::Decode {
            operation: "image inspect",
            detail: e.to_string(),
        })?;
    if images.is_empty() {
        return Err(RuntimeError::Decode {
            operation: "image inspect",
            detail: "empty result".into(),
        });
    }
    Ok(images.swap_remove(0))
}

fn parse_exit_status(line: &str) -> Result<i64> {
    line.parse().map_err(|_| RuntimeError::Decode {
        operation: "wait",
        detail: format!("not an exit status: {line:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_errors_are_recognised() {
        assert!(is_missing_image(
            "Error response from daemon: No such image: crawler:1"
        ));
        assert!(is_missing_image("Error: No such object: crawler:1"));
        assert!(!is_missing_image(
            "Cannot connect to the Docker daemon at unix:///var/run/docker.sock"
        ));
    }

    #[test]
    fn parse_inspect_takes_first_image() {
        let json = br#"[{"Id":"sha256:1","RepoTags":["a:1"]},{"Id":"sha256:2"}]"#;
        let meta = parse_inspect(json).unwrap();
        assert_eq!(meta.id, "sha256:1");
    }

    #[test]
    fn parse_inspect_rejects_empty_array() {
        assert!(matches!(
            parse_inspect(b"[]"),
            Err(RuntimeError::Decode { .. })
        ));
    }

    #[test]
    fn parse_inspect_rejects_garbage() {
        assert!(parse_inspect(b"not json").is_err());
    }

    #[test]
    fn parse_exit_status_reads_integers() {
        assert_eq!(parse_exit_status("0").unwrap(), 0);
        assert_eq!(parse_exit_status("137").unwrap(), 137);
        assert!(parse_exit_status("").is_err());
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = DockerCli::with_binary(dir.path().join("no-docker-here"));
        let image = ImageRef::new("crawler", "1");
        let err = client.inspect_image(&image).unwrap_err();
        assert!(matches!(err, RuntimeError::Unavailable { .. }));
    }
}
