//! Typed description of a single function invocation.
//!
//! The gateway never builds command lines as text. It fills an
//! [`InvocationRequest`] with the image, mount, network, environment,
//! handler identifier and serialised event, and the executor turns those
//! fields into an argument vector. Request content (paths, headers, bodies)
//! only ever travels inside the payload argument, so no shell ever sees it.

use std::fmt;

use serde::Serialize;

use crate::error::InvokerError;

/// Directory the function code is mounted at inside the container.
pub const TASK_DIRECTORY: &str = "/var/task";

/// Volume specification passed to the container engine.
///
/// # Example
///
/// ```
/// use lambda_dev_invoker::protocol::VolumeMount;
///
/// let mount = VolumeMount::named_volume("app-sync");
/// assert_eq!(mount.to_string(), "app-sync:/var/task:nocopy");
///
/// let mount = VolumeMount::bind("/home/dev/app");
/// assert_eq!(mount.to_string(), "/home/dev/app:/var/task");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    source: String,
    target: String,
    nocopy: bool,
}

impl VolumeMount {
    /// Bind-mounts a host directory at the task directory.
    #[must_use]
    pub fn bind(host_directory: impl Into<String>) -> Self {
        Self {
            source: host_directory.into(),
            target: String::from(TASK_DIRECTORY),
            nocopy: false,
        }
    }

    /// Mounts a named volume read/write at the task directory without
    /// copying the image's existing contents into it.
    #[must_use]
    pub fn named_volume(name: impl Into<String>) -> Self {
        Self {
            source: name.into(),
            target: String::from(TASK_DIRECTORY),
            nocopy: true,
        }
    }

    /// Host directory or volume name.
    #[must_use]
    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    /// Mount point inside the container.
    #[must_use]
    pub fn target(&self) -> &str {
        self.target.as_str()
    }

    /// Whether the `nocopy` volume option is set.
    #[must_use]
    pub const fn nocopy(&self) -> bool {
        self.nocopy
    }
}

impl fmt::Display for VolumeMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)?;
        if self.nocopy {
            f.write_str(":nocopy")?;
        }
        Ok(())
    }
}

/// Serialised event handed to the function as its single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationPayload(String);

impl InvocationPayload {
    /// Serialises `event` to compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::SerializeRequest`] if the event cannot be
    /// represented as JSON.
    pub fn from_event<T: Serialize>(event: &T) -> Result<Self, InvokerError> {
        serde_json::to_string(event)
            .map(Self)
            .map_err(InvokerError::from)
    }

    /// JSON text of the payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Everything an executor needs to run one function invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    image: String,
    mount: VolumeMount,
    network: Option<String>,
    environment: Vec<(String, String)>,
    handler: String,
    payload: InvocationPayload,
}

impl InvocationRequest {
    /// Creates a request with no network and no environment.
    #[must_use]
    pub fn new(
        image: impl Into<String>,
        mount: VolumeMount,
        handler: impl Into<String>,
        payload: InvocationPayload,
    ) -> Self {
        Self {
            image: image.into(),
            mount,
            network: None,
            environment: Vec::new(),
            handler: handler.into(),
            payload,
        }
    }

    /// Joins the container to `network`.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Appends an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push((key.into(), value.into()));
        self
    }

    /// Image reference, for example `lambci/lambda:nodejs8.10`.
    #[must_use]
    pub fn image(&self) -> &str {
        self.image.as_str()
    }

    /// Function code mount.
    #[must_use]
    pub const fn mount(&self) -> &VolumeMount {
        &self.mount
    }

    /// Container network, if any.
    #[must_use]
    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }

    /// Environment variables in the order they were added.
    #[must_use]
    pub fn environment(&self) -> &[(String, String)] {
        &self.environment
    }

    /// Handler identifier, for example `index.handler`.
    #[must_use]
    pub fn handler(&self) -> &str {
        self.handler.as_str()
    }

    /// Serialised event.
    #[must_use]
    pub const fn payload(&self) -> &InvocationPayload {
        &self.payload
    }
}

/// Raw result of a completed invocation.
///
/// The text is not interpreted here; the gateway parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutput {
    stdout: String,
    exit_status: Option<i32>,
}

impl InvocationOutput {
    /// Wraps captured standard output and the exit status, when known.
    #[must_use]
    pub fn new(stdout: impl Into<String>, exit_status: Option<i32>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_status,
        }
    }

    /// Captured standard output.
    #[must_use]
    pub fn stdout(&self) -> &str {
        self.stdout.as_str()
    }

    /// Consumes the output, returning standard output.
    #[must_use]
    pub fn into_stdout(self) -> String {
        self.stdout
    }

    /// Process exit code; `None` when the process was killed by a signal or
    /// the executor does not report one.
    #[must_use]
    pub const fn exit_status(&self) -> Option<i32> {
        self.exit_status
    }
}
