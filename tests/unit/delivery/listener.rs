//! Unit tests for the long-poll command listener

use crate::mock_transport::{bare_update, text_update, CountingHandler, ScriptedTransport};
use sentinel::delivery::{CommandHandler, DeliveryConfig, DeliveryService, ACK_TEXT};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{timeout, Duration};

const RECIPIENT: i64 = 42;
const COMMAND: &str = "/advice";

fn config() -> DeliveryConfig {
    let mut config = DeliveryConfig::new(RECIPIENT, COMMAND);
    config.poll_retry_delay = Duration::from_millis(10);
    config
}

async fn listen_until_drained(transport: ScriptedTransport, handler: Arc<CountingHandler>) -> Arc<ScriptedTransport> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let transport = Arc::new(transport.stop_when_drained(shutdown_tx));
    let listener = DeliveryService::new(transport.clone(), config()).listener();

    let handler: Arc<dyn CommandHandler> = handler;
    timeout(Duration::from_secs(5), listener.listen(shutdown_rx, handler))
        .await
        .expect("listener should stop once the script is drained");
    transport
}

#[tokio::test]
async fn test_backlog_is_skipped_on_startup() {
    let handler = Arc::new(CountingHandler::default());
    let transport = ScriptedTransport::new()
        // Five commands piled up while offline; only the newest is reported.
        .with_latest(Some(text_update(105, RECIPIENT, COMMAND)))
        .push_poll(vec![text_update(106, RECIPIENT, COMMAND)]);

    let transport = listen_until_drained(transport, handler.clone()).await;

    let offsets = transport.requested_offsets();
    assert_eq!(offsets[0], 106);
    assert!(offsets.iter().all(|offset| *offset > 105));
    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn test_cursor_advances_past_filtered_updates() {
    let transport = Arc::new(ScriptedTransport::new());
    let handler = CountingHandler::default();
    let mut listener = DeliveryService::new(transport.clone(), config()).listener();

    let batch = vec![
        text_update(10, 999, COMMAND),
        bare_update(11),
        text_update(12, RECIPIENT, "hello"),
        text_update(13, RECIPIENT, ""),
    ];
    let dispatched = listener.process_batch(batch, &handler).await;

    assert_eq!(dispatched, 0);
    assert_eq!(handler.calls(), 0);
    assert_eq!(listener.cursor(), 14);
    assert!(transport.sent_messages().is_empty());
}

#[tokio::test]
async fn test_cursor_is_max_id_plus_one_with_commands() {
    let transport = Arc::new(ScriptedTransport::new());
    let handler = CountingHandler::default();
    let mut listener = DeliveryService::new(transport.clone(), config()).listener();

    let batch = vec![
        text_update(20, RECIPIENT, COMMAND),
        text_update(21, 7, "spam"),
        text_update(22, RECIPIENT, COMMAND),
    ];
    let dispatched = listener.process_batch(batch, &handler).await;

    assert_eq!(dispatched, 2);
    assert_eq!(handler.calls(), 2);
    assert_eq!(listener.cursor(), 23);
    assert_eq!(transport.sent_messages(), vec![ACK_TEXT.to_string(), ACK_TEXT.to_string()]);
}

#[tokio::test]
async fn test_command_must_match_exactly() {
    let transport = Arc::new(ScriptedTransport::new());
    let handler = CountingHandler::default();
    let mut listener = DeliveryService::new(transport.clone(), config()).listener();

    let batch = vec![
        text_update(1, RECIPIENT, "/advice "),
        text_update(2, RECIPIENT, "/ADVICE"),
        text_update(3, RECIPIENT, "/advice please"),
    ];
    assert_eq!(listener.process_batch(batch, &handler).await, 0);
    assert_eq!(listener.cursor(), 4);
}

#[tokio::test]
async fn test_failed_ack_still_dispatches_command() {
    let transport = Arc::new(ScriptedTransport::always_failing());
    let handler = CountingHandler::default();
    let mut listener = DeliveryService::new(transport.clone(), config()).listener();

    let dispatched = listener
        .process_batch(vec![text_update(5, RECIPIENT, COMMAND)], &handler)
        .await;
    assert_eq!(dispatched, 1);
    assert_eq!(handler.calls(), 1);
    assert_eq!(transport.send_attempts(), 1);
}

#[tokio::test]
async fn test_poll_failure_retries_same_cursor() {
    let handler = Arc::new(CountingHandler::default());
    let transport = ScriptedTransport::new()
        .push_poll(vec![text_update(5, RECIPIENT, "noise")])
        .push_poll_error()
        .push_poll(vec![text_update(6, RECIPIENT, COMMAND)]);

    let transport = listen_until_drained(transport, handler.clone()).await;

    // No backlog: start at 0, then 6 twice (error, then success), then 7.
    assert_eq!(transport.requested_offsets(), vec![0, 6, 6, 7]);
    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn test_backlog_failure_starts_from_zero() {
    let transport = Arc::new(ScriptedTransport::new().with_latest_error());
    let mut listener = DeliveryService::new(transport.clone(), config()).listener();

    listener.skip_backlog().await;
    assert_eq!(listener.cursor(), 0);
}

#[tokio::test]
async fn test_empty_queue_leaves_cursor_at_zero() {
    let transport = Arc::new(ScriptedTransport::new().with_latest(None));
    let mut listener = DeliveryService::new(transport.clone(), config()).listener();

    listener.skip_backlog().await;
    assert_eq!(listener.cursor(), 0);
}

#[tokio::test]
async fn test_listen_returns_when_already_cancelled() {
    let transport = Arc::new(ScriptedTransport::new().push_poll(vec![text_update(1, RECIPIENT, COMMAND)]));
    let listener = DeliveryService::new(transport.clone(), config()).listener();
    let handler = Arc::new(CountingHandler::default());

    let (_shutdown_tx, shutdown_rx) = watch::channel(true);
    let dyn_handler: Arc<dyn CommandHandler> = handler.clone();
    timeout(Duration::from_secs(1), listener.listen(shutdown_rx, dyn_handler))
        .await
        .expect("listener should exit immediately");

    assert!(transport.requested_offsets().is_empty());
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn test_listen_stops_on_shutdown_while_idle() {
    let transport = Arc::new(ScriptedTransport::new());
    let listener = DeliveryService::new(transport.clone(), config()).listener();
    let handler: Arc<dyn CommandHandler> = Arc::new(CountingHandler::default());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(listener.listen(shutdown_rx, handler));

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send_replace(true);

    timeout(Duration::from_secs(1), handle)
        .await
        .expect("listener should observe shutdown at the next iteration")
        .expect("listener task should not panic");
    assert!(!transport.requested_offsets().is_empty());
}
