//! Stub [`InvocationExecutor`] returning canned output.

use std::io;
use std::sync::{Arc, Mutex};

use lambda_dev_invoker::{InvocationExecutor, InvocationOutput, InvocationRequest, InvokerError};

/// Executor that records every request and replies with a fixed result.
#[derive(Debug)]
pub struct StubExecutor {
    output: Mutex<Result<InvocationOutput, InvokerError>>,
    requests: Mutex<Vec<InvocationRequest>>,
}

impl StubExecutor {
    /// Replies with `stdout` and a zero exit status.
    #[must_use]
    pub fn printing(stdout: &str) -> Self {
        Self {
            output: Mutex::new(Ok(InvocationOutput::new(stdout, Some(0)))),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the canned stdout.
    pub fn set_stdout(&self, stdout: &str) {
        *self.output.lock().expect("output mutex poisoned") =
            Ok(InvocationOutput::new(stdout, Some(0)));
    }

    /// Fails every invocation as if the engine binary were missing.
    pub fn fail_to_launch(&self) {
        *self.output.lock().expect("output mutex poisoned") = Err(InvokerError::SpawnFailed {
            binary: String::from("docker"),
            source: Arc::new(io::Error::new(io::ErrorKind::NotFound, "No such file")),
        });
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<InvocationRequest> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .clone()
    }
}

impl InvocationExecutor for StubExecutor {
    fn execute(&self, request: &InvocationRequest) -> Result<InvocationOutput, InvokerError> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request.clone());
        self.output.lock().expect("output mutex poisoned").clone()
    }
}
