//! Errors raised while launching a function container.
//!
//! I/O errors are wrapped in `Arc` to keep the enum cheap to clone into
//! gateway errors and to satisfy the `result_large_err` Clippy lint.

use std::sync::Arc;

use thiserror::Error;

/// Errors arising from function invocation.
#[derive(Debug, Clone, Error)]
pub enum InvokerError {
    /// The event could not be serialised to JSON.
    #[error("failed to serialise invocation event: {0}")]
    SerializeRequest(#[source] Arc<serde_json::Error>),

    /// The container engine could not be started.
    #[error("failed to start '{binary}': {source}")]
    SpawnFailed {
        /// Executable that was launched.
        binary: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Output could not be collected from the container engine.
    #[error("I/O error communicating with '{binary}': {source}")]
    Io {
        /// Executable that was launched.
        binary: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The container exited unsuccessfully without writing anything to
    /// standard output. The message ends with the captured standard error
    /// when there is any.
    #[error(
        "container exited with {} and produced no output{}",
        describe_status(*.status),
        describe_stderr(.stderr)
    )]
    NoOutput {
        /// Exit code, when the process was not killed by a signal.
        status: Option<i32>,
        /// Trimmed standard error, possibly empty.
        stderr: String,
    },
}

impl From<serde_json::Error> for InvokerError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializeRequest(Arc::new(error))
    }
}

fn describe_status(status: Option<i32>) -> String {
    status.map_or_else(|| String::from("a signal"), |code| format!("status {code}"))
}

fn describe_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
