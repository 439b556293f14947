//! Orchestrator behaviour over in-memory transport sessions.

use std::sync::Arc;

use rstest::rstest;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use pocket_config::Endpoint;
use pocket_types::{Command, FrequencyRangeQuery, Range};

use super::support::{
    HealthEvent, PanickingHealthReporter, RecordingHealthReporter, SETTLE, memory_endpoint,
};
use crate::pipe::{Direction, PipeExit};
use crate::relay::{Relay, RelayError, RelayState, StopReason, application_channels};
use crate::transport::{MemoryTransport, Transport, TransportError, TransportSession};

/// Transport whose peer never accepts a connection.
struct RefusingTransport;

impl Transport for RefusingTransport {
    fn connect(
        &self,
        _endpoint: &Endpoint,
    ) -> impl Future<Output = Result<TransportSession, TransportError>> + Send {
        std::future::ready(Err(TransportError::Exhausted))
    }
}

fn relay<T: Transport>(transport: T) -> (Relay<T>, Arc<RecordingHealthReporter>) {
    let reporter = Arc::new(RecordingHealthReporter::default());
    (Relay::new(transport, reporter.clone()), reporter)
}

#[rstest]
#[tokio::test]
async fn relays_both_directions_until_cancelled() {
    let (transport, mut peer) = MemoryTransport::pair(1);
    let (relay, reporter) = relay(transport);
    let (mut ends, app) = application_channels(1);
    let cancel = CancellationToken::new();
    let mut state = relay.state();

    let endpoint = memory_endpoint();
    let running = relay.run(&endpoint, app, cancel.clone());
    let driver = async {
        state
            .wait_for(|current| *current == RelayState::Relaying)
            .await
            .expect("relay publishes state");

        peer.send_text(r#"{"cmd":"rr"}"#).await.expect("peer send");
        let received = ends.from_peer.recv().await.expect("decoded command");
        assert_eq!(received.tag(), "rr");

        ends.to_peer
            .send(Command::from(FrequencyRangeQuery::new(Range {
                start: 100_000,
                end: 4_000_000,
            })))
            .await
            .expect("application send");
        let frame = peer.recv().await.expect("encoded frame");
        assert_eq!(
            frame.as_text(),
            Some(r#"{"id":"","t":0,"cmd":"rr","range":{"Start":100000,"End":4000000}}"#)
        );

        cancel.cancel();
    };

    let (result, ()) = timeout(SETTLE, async { tokio::join!(running, driver) })
        .await
        .expect("relay finishes within bound");
    assert_eq!(result.expect("relay run"), StopReason::Cancelled);
    assert_eq!(
        reporter.states(),
        vec![
            RelayState::Connecting,
            RelayState::Relaying,
            RelayState::Stopped
        ]
    );
    assert_eq!(*relay.state().borrow(), RelayState::Stopped);
}

#[rstest]
#[tokio::test]
async fn closed_session_stops_the_relay() {
    let (transport, peer) = MemoryTransport::pair(1);
    let (relay, reporter) = relay(transport);
    let (_ends, app) = application_channels(1);
    drop(peer);

    let reason = timeout(
        SETTLE,
        relay.run(&memory_endpoint(), app, CancellationToken::new()),
    )
    .await
    .expect("relay finishes within bound")
    .expect("relay run");

    assert_eq!(reason, StopReason::SessionClosed);
    let inbound_exit = reporter.events().into_iter().find_map(|event| match event {
        HealthEvent::PipeFinished {
            direction: Direction::Inbound,
            report,
        } => Some(report.exit),
        _ => None,
    });
    assert_eq!(inbound_exit, Some(PipeExit::InputClosed));
}

#[rstest]
#[tokio::test]
async fn dropped_application_receiver_stops_the_relay() {
    let (transport, peer) = MemoryTransport::pair(1);
    let (relay, _reporter) = relay(transport);
    let (ends, app) = application_channels(1);
    drop(ends.from_peer);

    let endpoint = memory_endpoint();
    let running = relay.run(&endpoint, app, CancellationToken::new());
    let driver = async {
        // The inbound pipe only notices once it has something to deliver.
        peer.send_text(r#"{"cmd":"rr"}"#).await.expect("peer send");
    };
    let (result, ()) = timeout(SETTLE, async { tokio::join!(running, driver) })
        .await
        .expect("relay finishes within bound");

    assert_eq!(result.expect("relay run"), StopReason::ApplicationClosed);
}

#[rstest]
#[tokio::test]
async fn refused_session_is_a_connect_error() {
    let (relay, reporter) = relay(RefusingTransport);
    let (_ends, app) = application_channels(1);

    let result = relay
        .run(&memory_endpoint(), app, CancellationToken::new())
        .await;

    assert!(matches!(
        result,
        Err(RelayError::Connect {
            source: TransportError::Exhausted,
            ..
        })
    ));
    assert_eq!(
        reporter.states(),
        vec![RelayState::Connecting, RelayState::Stopped]
    );
}

#[rstest]
#[tokio::test]
async fn cancellation_before_connect_returns_cancelled() {
    let (transport, _peer) = MemoryTransport::pair(1);
    let (relay, reporter) = relay(transport);
    let (_ends, app) = application_channels(1);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let reason = relay
        .run(&memory_endpoint(), app, cancel)
        .await
        .expect("relay run");

    assert_eq!(reason, StopReason::Cancelled);
    assert_eq!(
        reporter.states(),
        vec![RelayState::Connecting, RelayState::Stopped]
    );
}

#[rstest]
#[tokio::test]
async fn undecodable_frames_are_reported_and_skipped() {
    let (transport, peer) = MemoryTransport::pair(1);
    let (relay, reporter) = relay(transport);
    let (mut ends, app) = application_channels(1);
    let cancel = CancellationToken::new();

    let endpoint = memory_endpoint();
    let running = relay.run(&endpoint, app, cancel.clone());
    let driver = async {
        peer.send_text(r#"{"cmd":"zz"}"#).await.expect("peer send");
        peer.send_text(r#"{"cmd":"sq","freq":42}"#)
            .await
            .expect("peer send");
        let Some(Command::SingleQuery(query)) = ends.from_peer.recv().await else {
            panic!("expected a single query");
        };
        assert_eq!(query.freq, 42);
        cancel.cancel();
    };
    let (result, ()) = timeout(SETTLE, async { tokio::join!(running, driver) })
        .await
        .expect("relay finishes within bound");

    assert_eq!(result.expect("relay run"), StopReason::Cancelled);
    assert_eq!(reporter.drops(Direction::Inbound), 1);
}

#[rstest]
#[tokio::test]
async fn panicking_pipe_ends_the_run_with_a_pipe_error() {
    let (transport, peer) = MemoryTransport::pair(1);
    let reporter = Arc::new(PanickingHealthReporter::default());
    let relay = Relay::new(transport, reporter.clone());
    let (_ends, app) = application_channels(1);

    let endpoint = memory_endpoint();
    let running = relay.run(&endpoint, app, CancellationToken::new());
    let driver = async {
        // The inbound pipe reports the drop, and the reporter panics.
        peer.send_text("not json").await.expect("peer send");
    };
    let (result, ()) = timeout(SETTLE, async { tokio::join!(running, driver) })
        .await
        .expect("relay finishes within bound");

    assert!(
        matches!(
            result,
            Err(RelayError::Pipe {
                direction: Direction::Inbound,
                ..
            })
        ),
        "unexpected outcome {result:?}"
    );
    assert_eq!(reporter.states().last(), Some(&RelayState::Stopped));
}
