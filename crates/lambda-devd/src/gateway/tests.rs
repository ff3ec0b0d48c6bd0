//! Unit tests for the gateway handler.

use std::io;
use std::sync::{Arc, Mutex};

use lambda_dev_config::TaskSource;
use lambda_dev_invoker::{InvocationOutput, InvocationRequest, InvokerError};
use rstest::{fixture, rstest};

use super::*;
use crate::routing::Route;

/// Executor returning the same output every time and recording requests.
struct CannedExecutor {
    output: Result<InvocationOutput, InvokerError>,
    requests: Mutex<Vec<InvocationRequest>>,
}

impl CannedExecutor {
    fn new(output: Result<InvocationOutput, InvokerError>) -> Arc<Self> {
        Arc::new(Self {
            output,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<InvocationRequest> {
        self.requests.lock().expect("requests mutex").clone()
    }
}

impl InvocationExecutor for CannedExecutor {
    fn execute(&self, request: &InvocationRequest) -> Result<InvocationOutput, InvokerError> {
        self.requests
            .lock()
            .expect("requests mutex")
            .push(request.clone());
        self.output.clone()
    }
}

fn gateway(executor: Arc<CannedExecutor>) -> Gateway {
    let routes = RouteTable::new(vec![Route::new("GET", "/users/:id", "users.show")]);
    let settings = RuntimeSettings::new(
        "nodejs8.10",
        "lambci/lambda",
        TaskSource::Directory("/srv/app".into()),
    );
    Gateway::new(routes, Dispatcher::new(settings, executor))
}

#[fixture]
fn hello() -> Arc<CannedExecutor> {
    CannedExecutor::new(Ok(InvocationOutput::new(
        r#"{"statusCode":200,"headers":{"X":"Y"},"body":"hello"}"#,
        Some(0),
    )))
}

#[rstest]
fn serves_matched_route(hello: Arc<CannedExecutor>) {
    let response = gateway(Arc::clone(&hello)).handle(GatewayRequest::new("GET", "/users/5"));
    assert_eq!(response.status, 200);
    assert_eq!(response.headers.get("X").map(String::as_str), Some("Y"));
    assert_eq!(response.body, "hello");

    let requests = hello.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].handler(), "users.show");
    assert_eq!(requests[0].image(), "lambci/lambda:nodejs8.10");
}

#[rstest]
fn unmatched_method_is_route_not_found(hello: Arc<CannedExecutor>) {
    let response = gateway(Arc::clone(&hello)).handle(GatewayRequest::new("POST", "/users/5"));
    assert_eq!(
        response,
        GatewayResponse::error("No handler configured for POST /users/5")
    );
    assert!(hello.requests().is_empty(), "nothing should be invoked");
}

#[rstest]
fn identical_requests_yield_identical_responses(hello: Arc<CannedExecutor>) {
    let gateway = gateway(hello);
    let request = GatewayRequest::new("GET", "/users/5")
        .with_header("x-docker-built", "1")
        .with_query("q", "1");
    let first = gateway.handle(request.clone());
    let second = gateway.handle(request);
    assert_eq!(first, second);
}

#[rstest]
#[case::malformed("not json", "Failed to parse JSON response from Lambda function: not json")]
#[case::body(
    r#"{"statusCode":200,"body":42}"#,
    "Body from Lambda function is not a string: 42"
)]
fn translation_errors_become_502(#[case] stdout: &str, #[case] message: &str) {
    let executor = CannedExecutor::new(Ok(InvocationOutput::new(stdout, Some(0))));
    let response = gateway(executor).handle(GatewayRequest::new("GET", "/users/5"));
    assert_eq!(response, GatewayResponse::error(message));
}

#[test]
fn invoker_failure_becomes_502() {
    let executor = CannedExecutor::new(Err(InvokerError::SpawnFailed {
        binary: String::from("docker"),
        source: Arc::new(io::Error::new(io::ErrorKind::NotFound, "not found")),
    }));
    let response = gateway(executor).handle(GatewayRequest::new("GET", "/users/5"));
    assert_eq!(response.status, ERROR_STATUS);
    assert!(response.headers.is_empty());
    assert!(
        response
            .body
            .starts_with("Failed to invoke Lambda function: failed to start 'docker'"),
        "unexpected body: {}",
        response.body
    );
}

#[test]
fn container_stderr_reaches_the_502_body() {
    let executor = CannedExecutor::new(Err(InvokerError::NoOutput {
        status: Some(125),
        stderr: String::from("Unable to find image 'lambci/lambda:nodejs9' locally"),
    }));
    let response = gateway(executor).handle(GatewayRequest::new("GET", "/users/5"));
    assert_eq!(response.status, ERROR_STATUS);
    assert!(
        response.body.contains("Unable to find image"),
        "unexpected body: {}",
        response.body
    );
}

#[rstest]
fn try_handle_exposes_typed_errors(hello: Arc<CannedExecutor>) {
    let error = gateway(hello)
        .try_handle(GatewayRequest::new("GET", "/accounts/5"))
        .expect_err("no route");
    match error {
        GatewayError::RouteNotFound { method, path } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "/accounts/5");
        }
        other => panic!("unexpected error: {other}"),
    }
}
