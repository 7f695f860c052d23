//! Scripted in-memory runtime for tests.
//!
//! Images and command results are declared up front; every call is
//! recorded so tests can assert which operations ran and in what order.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crawlship_common::types::{ContainerId, ImageRef};

use super::{ContainerRuntime, ImageMetadata, LogOptions};
use crate::error::{Result, RuntimeError};

/// Outcome of a scripted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRun {
    /// Exit status reported by `wait`.
    pub exit_code: i64,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl ScriptedRun {
    fn command_not_found(command: &[String]) -> Self {
        Self {
            exit_code: 127,
            stdout: String::new(),
            stderr: format!("{}: not found\n", command.first().map_or("", String::as_str)),
        }
    }
}

/// One recorded runtime call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `inspect_image` for the given reference.
    InspectImage(String),
    /// `create_container` with the given command.
    Create(Vec<String>),
    /// `start` on a container.
    Start(ContainerId),
    /// `wait` on a container.
    Wait(ContainerId),
    /// `logs` on a container with the given options.
    Logs(ContainerId, LogOptions),
    /// `remove` on a container.
    Remove(ContainerId),
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    containers: HashMap<ContainerId, Vec<String>>,
    next_id: usize,
}

/// In-memory [`ContainerRuntime`] driven by a script.
#[derive(Debug, Default)]
pub struct MemoryRuntime {
    images: HashSet<String>,
    runs: HashMap<Vec<String>, ScriptedRun>,
    inspect_failure: Option<String>,
    remove_failure: bool,
    start_failure: Option<String>,
    state: Mutex<State>,
}

impl MemoryRuntime {
    /// Creates an empty runtime with no images.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `image` available locally.
    #[must_use]
    pub fn with_image(mut self, image: &ImageRef) -> Self {
        let _ = self.images.insert(image.to_string());
        self
    }

    /// Scripts the result of running `command` in any image.
    ///
    /// Unscripted commands behave like a missing executable: exit 127 with
    /// a message on stderr.
    #[must_use]
    pub fn with_run(mut self, command: &[&str], exit_code: i64, stdout: &str, stderr: &str) -> Self {
        let _ = self.runs.insert(
            command.iter().map(|s| (*s).to_string()).collect(),
            ScriptedRun {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Makes `inspect_image` fail with a generic runtime error.
    #[must_use]
    pub fn with_inspect_failure(mut self, stderr: &str) -> Self {
        self.inspect_failure = Some(stderr.to_string());
        self
    }

    /// Makes `start` fail for every container, as when the command's
    /// executable is missing from the image.
    #[must_use]
    pub fn with_start_failure(mut self, stderr: &str) -> Self {
        self.start_failure = Some(stderr.to_string());
        self
    }

    /// Makes `remove` fail for every container.
    #[must_use]
    pub fn with_remove_failure(mut self) -> Self {
        self.remove_failure = true;
        self
    }

    /// Returns every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Returns the commands of every created container, in order.
    pub fn commands_run(&self) -> Vec<Vec<String>> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Create(cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the containers that were created and never removed.
    pub fn leftover_containers(&self) -> usize {
        self.lock().containers.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn scripted(&self, state: &State, id: &ContainerId) -> Result<ScriptedRun> {
        let command = state
            .containers
            .get(id)
            .ok_or_else(|| no_such_container("wait", id))?;
        Ok(self
            .runs
            .get(command)
            .cloned()
            .unwrap_or_else(|| ScriptedRun::command_not_found(command)))
    }
}

fn no_such_container(operation: &'static str, id: &ContainerId) -> RuntimeError {
    RuntimeError::Command {
        operation,
        status: Some(1),
        stderr: format!("No such container: {id}"),
    }
}

impl ContainerRuntime for MemoryRuntime {
    fn inspect_image(&self, image: &ImageRef) -> Result<ImageMetadata> {
        let reference = image.to_string();
        self.lock().calls.push(Call::InspectImage(reference.clone()));
        if let Some(stderr) = &self.inspect_failure {
            return Err(RuntimeError::Command {
                operation: "image inspect",
                status: Some(1),
                stderr: stderr.clone(),
            });
        }
        if !self.images.contains(&reference) {
            return Err(RuntimeError::ImageNotFound { image: reference });
        }
        Ok(ImageMetadata {
            id: format!("sha256:{reference}"),
            repo_tags: vec![reference],
            ..ImageMetadata::default()
        })
    }

    fn create_container(&self, image: &ImageRef, command: &[String]) -> Result<ContainerId> {
        let mut state = self.lock();
        state.calls.push(Call::Create(command.to_vec()));
        if !self.images.contains(&image.to_string()) {
            return Err(RuntimeError::ImageNotFound {
                image: image.to_string(),
            });
        }
        state.next_id += 1;
        let id = ContainerId::new(format!("mem-{}", state.next_id));
        let _ = state.containers.insert(id.clone(), command.to_vec());
        Ok(id)
    }

    fn start(&self, id: &ContainerId) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Start(id.clone()));
        if !state.containers.contains_key(id) {
            return Err(no_such_container("start", id));
        }
        if let Some(stderr) = &self.start_failure {
            return Err(RuntimeError::Command {
                operation: "start",
                status: Some(1),
                stderr: stderr.clone(),
            });
        }
        Ok(())
    }

    fn wait(&self, id: &ContainerId) -> Result<i64> {
        let mut state = self.lock();
        state.calls.push(Call::Wait(id.clone()));
        Ok(self.scripted(&state, id)?.exit_code)
    }

    fn logs(&self, id: &ContainerId, options: LogOptions) -> Result<String> {
        let mut state = self.lock();
        state.calls.push(Call::Logs(id.clone(), options));
        let run = self.scripted(&state, id)?;
        let mut logs = String::new();
        if options.stdout {
            logs.push_str(&run.stdout);
        }
        if options.stderr {
            logs.push_str(&run.stderr);
        }
        Ok(logs)
    }

    fn remove(&self, id: &ContainerId) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Remove(id.clone()));
        if self.remove_failure {
            return Err(RuntimeError::Command {
                operation: "rm",
                status: Some(1),
                stderr: "removal of container is already in progress".into(),
            });
        }
        state
            .containers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| no_such_container("rm", id))
    }
}
