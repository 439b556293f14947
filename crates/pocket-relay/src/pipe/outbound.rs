//! Application-to-peer pipe: typed commands in, text frames out.

use pocket_types::{Command, EncodeError};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{Direction, PIPE_TARGET, PipeExit, PipeReport, PipeStats, deliver, next_input};
use crate::health::HealthReporter;
use crate::wire::WireMessage;

/// Encodes one command as a text frame.
///
/// # Errors
///
/// Returns the encoder's error when the command is not well formed.
pub fn encode(command: &Command) -> Result<WireMessage, EncodeError> {
    command.encode().map(WireMessage::text)
}

/// Forwards commands from `input` to `output` as text frames.
///
/// Exactly one frame is written per command that encodes; commands that fail
/// to encode are logged, reported and dropped. Order is preserved.
pub async fn run(
    mut input: Receiver<Command>,
    output: Sender<WireMessage>,
    cancel: CancellationToken,
    reporter: &dyn HealthReporter,
) -> PipeReport {
    let mut stats = PipeStats::default();
    let exit = loop {
        let command = match next_input(&mut input, &cancel).await {
            Ok(command) => command,
            Err(exit) => break exit,
        };
        let frame = match encode(&command) {
            Ok(frame) => frame,
            Err(error) => {
                stats.dropped += 1;
                warn!(
                    target: PIPE_TARGET,
                    direction = %Direction::Outbound,
                    tag = command.tag(),
                    error = %error,
                    "dropping command that failed to encode"
                );
                reporter.message_dropped(Direction::Outbound, &error);
                continue;
            }
        };
        if let Err(exit) = deliver(&output, frame, &cancel).await {
            break exit;
        }
        stats.forwarded += 1;
        debug!(
            target: PIPE_TARGET,
            direction = %Direction::Outbound,
            tag = command.tag(),
            "forwarded command"
        );
    };
    debug!(
        target: PIPE_TARGET,
        direction = %Direction::Outbound,
        exit = ?exit,
        forwarded = stats.forwarded,
        dropped = stats.dropped,
        "pipe stopped"
    );
    PipeReport { exit, stats }
}
