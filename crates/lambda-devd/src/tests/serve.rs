//! End-to-end test over a real TCP socket.

use std::sync::Arc;

use lambda_dev_config::{Config, RouteDeclaration, TaskSource};
use lambda_dev_invoker::InvocationExecutor;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::bootstrap::{StaticConfigLoader, bootstrap_with};
use crate::health::HealthReporter;

use super::support::{HealthEvent, RecordingHealthReporter, StubExecutor};

async fn send(address: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(address).await.expect("connect");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    response
}

#[tokio::test]
async fn serves_requests_until_shutdown() {
    let mut config = Config::new("python3.6", TaskSource::SyncVolume("app-sync".into()));
    config.routes = vec![RouteDeclaration::new("GET", "/hello/:name", "hello.handler")];
    let reporter = Arc::new(RecordingHealthReporter::default());
    let stub = Arc::new(StubExecutor::printing(
        r#"{"statusCode":200,"headers":{"Content-Type":"text/plain"},"body":"hi"}"#,
    ));
    let executor: Arc<dyn InvocationExecutor> = stub.clone();
    let health: Arc<dyn HealthReporter> = reporter.clone();
    let daemon = bootstrap_with(&StaticConfigLoader::new(config), health, move |_| executor)
    .expect("bootstrap succeeds");

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local address");
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(daemon.serve_on(listener, async move {
        drop(stopped.await);
    }));

    let ok = send(
        address,
        "GET /hello/world?x=1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(ok.starts_with("HTTP/1.1 200"), "unexpected response: {ok}");
    assert!(ok.to_ascii_lowercase().contains("content-type: text/plain"));
    assert!(ok.ends_with("hi"), "unexpected response: {ok}");

    let missing = send(
        address,
        "DELETE /hello/world HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(missing.starts_with("HTTP/1.1 502"), "unexpected response: {missing}");
    assert!(missing.ends_with("No handler configured for DELETE /hello/world"));

    stop.send(()).expect("server still running");
    server
        .await
        .expect("server task joins")
        .expect("server stops cleanly");

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].image(), "lambci/lambda:python3.6");
    assert_eq!(requests[0].mount().to_string(), "app-sync:/var/task:nocopy");
    assert_eq!(
        reporter.events().last(),
        Some(&HealthEvent::ShutdownComplete)
    );
    assert!(
        reporter
            .events()
            .contains(&HealthEvent::ListenerReady(address))
    );
}
