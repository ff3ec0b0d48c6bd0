//! BDD world for gateway request scenarios.

use std::cell::RefCell;
use std::sync::Arc;

use lambda_dev_config::TaskSource;

use crate::dispatch::{Dispatcher, RuntimeSettings};
use crate::gateway::{Gateway, GatewayRequest, GatewayResponse};
use crate::routing::{Route, RouteTable};

use super::executor::StubExecutor;

/// Scenario state: the declared routes, the stub function and the
/// responses served so far.
pub struct GatewayWorld {
    routes: Vec<Route>,
    pub executor: Arc<StubExecutor>,
    pub responses: Vec<GatewayResponse>,
}

impl GatewayWorld {
    /// Builds a world with no routes and a function printing `{}`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            executor: Arc::new(StubExecutor::printing(r#"{"statusCode":200}"#)),
            responses: Vec::new(),
        }
    }

    /// Appends a route in declaration order.
    pub fn add_route(&mut self, method: &str, path: &str, handler: &str) {
        self.routes.push(Route::new(method, path, handler));
    }

    /// Serves `request` through a gateway built from the current state.
    pub fn serve(&mut self, request: GatewayRequest) {
        let settings = RuntimeSettings::new(
            "nodejs8.10",
            "lambci/lambda",
            TaskSource::Directory("/srv/app".into()),
        );
        let executor: Arc<StubExecutor> = Arc::clone(&self.executor);
        let gateway = Gateway::new(
            RouteTable::new(self.routes.clone()),
            Dispatcher::new(settings, executor),
        );
        self.responses.push(gateway.handle(request));
    }

    /// Most recent response.
    #[must_use]
    pub fn last_response(&self) -> &GatewayResponse {
        self.responses.last().expect("a request should have been served")
    }
}

impl Default for GatewayWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default gateway world fixture.
#[must_use]
pub fn gateway_world() -> RefCell<GatewayWorld> {
    RefCell::new(GatewayWorld::new())
}
