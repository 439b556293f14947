//! Test suites for the relay pipes, orchestrator and bootstrap.

mod relay_behaviour;
mod support;
