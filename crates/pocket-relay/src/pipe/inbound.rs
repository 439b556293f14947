//! Peer-to-application pipe: wire frames in, typed commands out.

use pocket_types::{Command, DecodeError, registry, sniff_tag};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{Direction, PIPE_TARGET, PipeExit, PipeReport, PipeStats, deliver, next_input};
use crate::health::HealthReporter;
use crate::wire::WireMessage;

/// Decodes one frame into a command.
///
/// The `cmd` tag is sniffed first; the registry entry for that tag then
/// decodes the full payload. Text and binary frames are treated alike.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] for payloads that are not UTF-8 JSON
/// objects, [`DecodeError::MissingTag`] when `cmd` is absent or empty,
/// [`DecodeError::UnknownTag`] for unregistered tags and
/// [`DecodeError::Shape`] when the payload does not fit the variant.
pub fn decode(message: &WireMessage) -> Result<Command, DecodeError> {
    let payload = message.payload.as_slice();
    if let Err(error) = std::str::from_utf8(payload) {
        return Err(DecodeError::malformed(format!(
            "payload is not valid UTF-8: {error}"
        )));
    }
    let tag = sniff_tag(payload)?;
    registry::require(&tag)?.decode(payload)
}

/// Forwards frames from `input` to `output` as typed commands.
///
/// At most one command is written per frame; frames that fail to decode are
/// logged, reported and dropped. Order is preserved.
pub async fn run(
    mut input: Receiver<WireMessage>,
    output: Sender<Command>,
    cancel: CancellationToken,
    reporter: &dyn HealthReporter,
) -> PipeReport {
    let mut stats = PipeStats::default();
    let exit = loop {
        let message = match next_input(&mut input, &cancel).await {
            Ok(message) => message,
            Err(exit) => break exit,
        };
        let command = match decode(&message) {
            Ok(command) => command,
            Err(error) => {
                stats.dropped += 1;
                warn!(
                    target: PIPE_TARGET,
                    direction = %Direction::Inbound,
                    frame = ?message.kind,
                    bytes = message.payload.len(),
                    error = %error,
                    "dropping message that failed to decode"
                );
                reporter.message_dropped(Direction::Inbound, &error);
                continue;
            }
        };
        let tag = command.tag();
        if let Err(exit) = deliver(&output, command, &cancel).await {
            break exit;
        }
        stats.forwarded += 1;
        debug!(
            target: PIPE_TARGET,
            direction = %Direction::Inbound,
            tag,
            "delivered command"
        );
    };
    debug!(
        target: PIPE_TARGET,
        direction = %Direction::Inbound,
        exit = ?exit,
        forwarded = stats.forwarded,
        dropped = stats.dropped,
        "pipe stopped"
    );
    PipeReport { exit, stats }
}
