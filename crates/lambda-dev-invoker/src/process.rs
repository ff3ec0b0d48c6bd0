//! Docker-backed invocation.
//!
//! [`DockerExecutor`] turns an [`InvocationRequest`] into the argument vector
//! `run --rm -v <mount> [-e K=V]... [--network N] <image> <handler> <payload>`
//! and runs the engine directly, without a shell. Standard output is returned
//! verbatim; standard error is only logged.

use std::process::{Command, Output, Stdio};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::error::InvokerError;
use crate::executor::InvocationExecutor;
use crate::protocol::{InvocationOutput, InvocationRequest};

/// Tracing target for container launches.
const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Executes invocations by running the container engine CLI.
///
/// # Example
///
/// ```rust,no_run
/// use lambda_dev_invoker::process::DockerExecutor;
/// use lambda_dev_invoker::protocol::{InvocationPayload, InvocationRequest, VolumeMount};
/// use lambda_dev_invoker::InvocationExecutor;
///
/// let executor = DockerExecutor::new("docker");
/// let payload = InvocationPayload::from_event(&serde_json::json!({"path": "/"}))
///     .expect("event serialises");
/// let request = InvocationRequest::new(
///     "lambci/lambda:nodejs8.10",
///     VolumeMount::bind("/srv/app"),
///     "index.handler",
///     payload,
/// );
/// let output = executor.execute(&request).expect("container runs");
/// println!("{}", output.stdout());
/// ```
#[derive(Debug, Clone)]
pub struct DockerExecutor {
    binary: String,
}

impl DockerExecutor {
    /// Uses `binary` (a name on `PATH` or an absolute path) as the engine.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Engine executable.
    #[must_use]
    pub fn binary(&self) -> &str {
        self.binary.as_str()
    }
}

impl InvocationExecutor for DockerExecutor {
    fn execute(&self, request: &InvocationRequest) -> Result<InvocationOutput, InvokerError> {
        let args = command_args(request);
        debug!(
            target: PROCESS_TARGET,
            binary = %self.binary,
            image = request.image(),
            handler = request.handler(),
            payload_bytes = request.payload().as_str().len(),
            "starting function container"
        );

        let started = Instant::now();
        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| self.launch_error(err))?;

        debug!(
            target: PROCESS_TARGET,
            handler = request.handler(),
            status = ?output.status,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "function container exited"
        );
        into_invocation_output(output)
    }
}

impl DockerExecutor {
    fn launch_error(&self, err: std::io::Error) -> InvokerError {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                InvokerError::SpawnFailed {
                    binary: self.binary.clone(),
                    source: Arc::new(err),
                }
            }
            _ => InvokerError::Io {
                binary: self.binary.clone(),
                source: Arc::new(err),
            },
        }
    }
}

/// Builds the engine arguments for `request`, in order.
#[must_use]
pub fn command_args(request: &InvocationRequest) -> Vec<String> {
    let mut args = vec![
        String::from("run"),
        String::from("--rm"),
        String::from("-v"),
        request.mount().to_string(),
    ];
    for (key, value) in request.environment() {
        args.push(String::from("-e"));
        args.push(format!("{key}={value}"));
    }
    if let Some(network) = request.network() {
        args.push(String::from("--network"));
        args.push(network.to_owned());
    }
    args.push(request.image().to_owned());
    args.push(request.handler().to_owned());
    args.push(request.payload().as_str().to_owned());
    args
}

fn into_invocation_output(output: Output) -> Result<InvocationOutput, InvokerError> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr_text = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr_text.trim();
    if !stderr.is_empty() {
        debug!(
            target: PROCESS_TARGET,
            stderr,
            "function container stderr output"
        );
    }

    if !output.status.success() && stdout.trim().is_empty() {
        return Err(InvokerError::NoOutput {
            status: output.status.code(),
            stderr: stderr.to_owned(),
        });
    }
    Ok(InvocationOutput::new(stdout, output.status.code()))
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;
    use crate::protocol::{InvocationPayload, VolumeMount};

    #[fixture]
    fn request() -> InvocationRequest {
        let payload = InvocationPayload::from_event(&serde_json::json!({"path": "/a b"}))
            .expect("payload serialises");
        InvocationRequest::new(
            "lambci/lambda:nodejs8.10",
            VolumeMount::bind("/srv/app"),
            "index.handler",
            payload,
        )
    }

    fn script(dir: &TempDir, body: &str) -> String {
        let path = dir.path().join("fake-docker");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        let mut permissions = fs::metadata(&path).expect("metadata").permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions).expect("chmod");
        path_string(&path)
    }

    fn path_string(path: &Path) -> String {
        path.to_str().expect("utf-8 temp path").to_owned()
    }

    #[rstest]
    fn builds_minimal_argument_vector(request: InvocationRequest) {
        assert_eq!(
            command_args(&request),
            [
                "run",
                "--rm",
                "-v",
                "/srv/app:/var/task",
                "lambci/lambda:nodejs8.10",
                "index.handler",
                r#"{"path":"/a b"}"#,
            ]
        );
    }

    #[rstest]
    fn places_environment_and_network_before_image(request: InvocationRequest) {
        let request = request
            .with_env("STAGE", "local")
            .with_env("EMPTY", "")
            .with_network("dev");
        let args = command_args(&request);
        assert_eq!(
            &args[4..10],
            ["-e", "STAGE=local", "-e", "EMPTY=", "--network", "dev"]
        );
        assert_eq!(args[10], "lambci/lambda:nodejs8.10");
    }

    #[rstest]
    fn returns_stdout_verbatim(request: InvocationRequest) {
        let dir = TempDir::new().expect("temp dir");
        let binary = script(&dir, r#"printf '{"statusCode":200}'; echo noise >&2"#);
        let output = DockerExecutor::new(binary)
            .execute(&request)
            .expect("invocation succeeds");
        assert_eq!(output.stdout(), r#"{"statusCode":200}"#);
        assert_eq!(output.exit_status(), Some(0));
    }

    #[rstest]
    fn passes_payload_as_single_argument(request: InvocationRequest) {
        let dir = TempDir::new().expect("temp dir");
        let binary = script(&dir, r#"eval "last=\${$#}"; printf '%s' "$last""#);
        let output = DockerExecutor::new(binary)
            .execute(&request)
            .expect("invocation succeeds");
        assert_eq!(output.stdout(), r#"{"path":"/a b"}"#);
    }

    #[rstest]
    fn keeps_output_of_failed_container(request: InvocationRequest) {
        let dir = TempDir::new().expect("temp dir");
        let binary = script(&dir, "echo 'Traceback'; exit 1");
        let output = DockerExecutor::new(binary)
            .execute(&request)
            .expect("output is still returned");
        assert_eq!(output.stdout(), "Traceback\n");
        assert_eq!(output.exit_status(), Some(1));
    }

    #[rstest]
    fn silent_failure_is_no_output(request: InvocationRequest) {
        let dir = TempDir::new().expect("temp dir");
        let binary = script(&dir, "echo 'no such image' >&2; exit 125");
        let error = DockerExecutor::new(binary)
            .execute(&request)
            .expect_err("nothing was printed");
        match error {
            InvokerError::NoOutput { status, stderr } => {
                assert_eq!(status, Some(125));
                assert_eq!(stderr, "no such image");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn missing_binary_is_spawn_failure(request: InvocationRequest) {
        let error = DockerExecutor::new("/nonexistent/docker")
            .execute(&request)
            .expect_err("binary is missing");
        assert!(
            matches!(
                error,
                InvokerError::SpawnFailed { ref binary, .. } if binary == "/nonexistent/docker"
            ),
            "unexpected error: {error}"
        );
    }
}
