//! Test suites for the gateway daemon.

mod serve;
mod support;
