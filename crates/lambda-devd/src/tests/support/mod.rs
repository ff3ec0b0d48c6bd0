//! Shared test doubles and worlds.

mod executor;
mod gateway_world;
mod reporter;

pub use executor::StubExecutor;
pub use gateway_world::{GatewayWorld, gateway_world};
pub use reporter::{HealthEvent, RecordingHealthReporter};
