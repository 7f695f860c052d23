//! Runtime client errors.

use thiserror::Error;

/// Errors raised while talking to the container runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The requested image is not present in the local runtime.
    #[error("no such image: {image}")]
    ImageNotFound {
        /// Image reference that was looked up.
        image: String,
    },

    /// The runtime client cannot be used at all.
    #[error("container runtime unavailable: {reason}")]
    Unavailable {
        /// Why the runtime could not be reached.
        reason: String,
    },

    /// A runtime operation returned a failure.
    #[error("`docker {operation}` failed (exit {status:?}): {stderr}")]
    Command {
        /// Runtime operation that failed.
        operation: &'static str,
        /// Exit status of the client, if any.
        status: Option<i32>,
        /// Error output reported by the client.
        stderr: String,
    },

    /// The runtime answered with output that could not be understood.
    #[error("unexpected output from `docker {operation}`: {detail}")]
    Decode {
        /// Runtime operation whose output was malformed.
        operation: &'static str,
        /// Description of the decoding problem.
        detail: String,
    },
}

/// Convenience alias for runtime results.
pub type Result<T> = std::result::Result<T, RuntimeError>;
