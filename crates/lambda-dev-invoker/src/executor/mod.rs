//! Execution seam between the gateway and the container engine.
//!
//! The gateway depends on [`InvocationExecutor`] rather than on a concrete
//! process launcher, so tests can substitute doubles that return canned
//! output without starting containers.

use crate::error::InvokerError;
use crate::protocol::{InvocationOutput, InvocationRequest};

/// Runs a function once and returns what it printed.
///
/// The production implementation is
/// [`DockerExecutor`](crate::process::DockerExecutor). Implementations block
/// until the invocation finishes; async callers should run them on a
/// blocking thread.
///
/// # Example
///
/// ```
/// use lambda_dev_invoker::{InvocationExecutor, InvocationOutput, InvocationRequest, InvokerError};
///
/// struct Canned;
///
/// impl InvocationExecutor for Canned {
///     fn execute(&self, _request: &InvocationRequest) -> Result<InvocationOutput, InvokerError> {
///         Ok(InvocationOutput::new(r#"{"statusCode":204}"#, Some(0)))
///     }
/// }
/// ```
pub trait InvocationExecutor: Send + Sync {
    /// Executes the invocation described by `request`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvokerError`] if the engine cannot be launched, its
    /// output cannot be collected, or it fails without producing output.
    fn execute(&self, request: &InvocationRequest) -> Result<InvocationOutput, InvokerError>;
}
