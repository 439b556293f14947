//! Entry point for the `pocket-relay` binary.
//!
//! Delegates to [`pocket_relay::run_relay`], which loads configuration,
//! installs telemetry and relays frames until interrupted.

use std::io::{self, Write};
use std::process::ExitCode;

use pocket_relay::StopReason;

fn main() -> ExitCode {
    let outcome = pocket_relay::run_relay();
    let mut stderr = io::stderr().lock();
    match outcome {
        Ok(StopReason::Cancelled) => ExitCode::SUCCESS,
        Ok(reason) => {
            let _ = writeln!(stderr, "pocket-relay: session ended ({reason:?})");
            ExitCode::FAILURE
        }
        Err(error) => {
            let _ = writeln!(stderr, "pocket-relay: {error}");
            ExitCode::FAILURE
        }
    }
}
