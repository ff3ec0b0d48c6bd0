//! Function invocation for the `lambda-devd` gateway.
//!
//! Each HTTP request the gateway accepts becomes one short-lived container:
//! the function code is mounted at `/var/task`, the handler identifier and
//! the JSON event are passed as arguments, and whatever the container prints
//! on standard output is handed back to the gateway for translation.
//!
//! [`InvocationRequest`] describes the invocation, [`InvocationExecutor`] is
//! the seam the gateway calls through, and [`DockerExecutor`] is the
//! production implementation.

pub mod error;
pub mod executor;
pub mod process;
pub mod protocol;

pub use self::error::InvokerError;
pub use self::executor::InvocationExecutor;
pub use self::process::DockerExecutor;
pub use self::protocol::{InvocationOutput, InvocationPayload, InvocationRequest, VolumeMount};
