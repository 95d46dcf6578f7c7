/**
 * Redis Bridge Backend
 *
 * Cross-process fan-out over Redis pub/sub. One multiplexed connection
 * publishes; one pub/sub connection holds the single wildcard PSUBSCRIBE on
 * `conversation:*` and feeds received frames into the shared bridge-receipt
 * path.
 *
 * # Failure Policy
 *
 * - Publishes are retried a bounded number of times; a frame that still
 *   fails is logged as a dead letter and dropped. Nothing is buffered for
 *   redelivery; the bridge stays at-most-once.
 * - A lost Redis connection triggers reconnection with exponential backoff.
 *   While disconnected, `publish` refuses new frames so senders get a
 *   delivery-error acknowledgment instead of silent loss.
 */
use super::channel::{ConversationChannel, CHANNEL_PATTERN};
use crate::relay::error::RelayError;
use crate::relay::messaging::delivery::handle_bridge_frame;
use crate::relay::server::state::FanoutState;
use futures_util::StreamExt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const PUBLISH_MAX_ATTEMPTS: usize = 3;
const PUBLISH_RETRY_DELAYS: &[Duration] = &[Duration::from_millis(100), Duration::from_millis(200)];

enum BridgeCommand {
    Publish { channel: String, payload: String },
}

/// Counters exposed on the health endpoint.
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    pub published: AtomicU64,
    pub received: AtomicU64,
    pub publish_errors: AtomicU64,
    pub reconnects: AtomicU64,
    pub connected: AtomicBool,
}

/// Exponential backoff between reconnection attempts.
struct ExponentialBackoff {
    current: Duration,
}

impl ExponentialBackoff {
    const INITIAL: Duration = Duration::from_millis(500);
    const MAX: Duration = Duration::from_secs(30);

    fn new() -> Self {
        Self {
            current: Self::INITIAL,
        }
    }

    /// The delay to wait before the next attempt; doubles up to the cap.
    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(Self::MAX);
        delay
    }

    fn reset(&mut self) {
        self.current = Self::INITIAL;
    }
}

/// Handle to the Redis bridge task.
#[derive(Clone)]
pub struct RedisBridge {
    tx: mpsc::UnboundedSender<BridgeCommand>,
    metrics: Arc<BridgeMetrics>,
}

impl RedisBridge {
    /// Spawn the bridge task: connects to Redis, subscribes to the
    /// conversation wildcard, and runs until the handle (and with it the
    /// command channel) is dropped.
    pub fn spawn(url: String, fanout: FanoutState) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let metrics = Arc::new(BridgeMetrics::default());
        let task_metrics = metrics.clone();
        tokio::spawn(async move {
            listener_task(url, fanout, rx, task_metrics).await;
        });
        Self { tx, metrics }
    }

    pub fn publish(&self, channel: &ConversationChannel, payload: String) -> Result<(), RelayError> {
        if !self.is_connected() {
            return Err(RelayError::bridge("bridge disconnected"));
        }
        self.tx
            .send(BridgeCommand::Publish {
                channel: channel.to_string(),
                payload,
            })
            .map_err(|_| RelayError::bridge("bridge task stopped"))
    }

    pub fn is_connected(&self) -> bool {
        self.metrics.connected.load(Ordering::Relaxed)
    }

    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }

    #[cfg(test)]
    fn disconnected_for_test() -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self {
            tx,
            metrics: Arc::new(BridgeMetrics::default()),
        }
    }
}

/// Publish one frame with bounded retry. Returns false after the final
/// attempt fails; the caller logs the dead letter.
async fn publish_with_retry(
    conn: &mut redis::aio::MultiplexedConnection,
    channel: &str,
    payload: &str,
    metrics: &BridgeMetrics,
) -> bool {
    let mut last_err = String::new();
    for attempt in 0..PUBLISH_MAX_ATTEMPTS {
        match redis::cmd("PUBLISH")
            .arg(channel)
            .arg(payload)
            .query_async::<()>(conn)
            .await
        {
            Ok(()) => {
                metrics.published.fetch_add(1, Ordering::Relaxed);
                return true;
            }
            Err(e) => {
                last_err = e.to_string();
                if let Some(delay) = PUBLISH_RETRY_DELAYS.get(attempt) {
                    tokio::time::sleep(*delay).await;
                }
            }
        }
    }
    metrics.publish_errors.fetch_add(1, Ordering::Relaxed);
    tracing::error!(
        "[Bridge] Dead letter on {} after {} attempts: {}",
        channel,
        PUBLISH_MAX_ATTEMPTS,
        last_err
    );
    false
}

/// One connected session: runs until the command channel closes (clean
/// shutdown, `Ok`) or the connection drops (`Err` with the reason).
async fn connect_and_run(
    url: &str,
    fanout: &FanoutState,
    cmd_rx: &mut mpsc::UnboundedReceiver<BridgeCommand>,
    metrics: &BridgeMetrics,
    backoff: &mut ExponentialBackoff,
) -> Result<(), String> {
    let client = redis::Client::open(url).map_err(|e| format!("invalid Redis URL: {e}"))?;

    let mut pub_conn = client
        .get_multiplexed_tokio_connection()
        .await
        .map_err(|e| format!("publish connection failed: {e}"))?;

    let mut pubsub = client
        .get_async_pubsub()
        .await
        .map_err(|e| format!("pubsub connection failed: {e}"))?;

    pubsub
        .psubscribe(CHANNEL_PATTERN)
        .await
        .map_err(|e| format!("psubscribe {CHANNEL_PATTERN} failed: {e}"))?;

    metrics.connected.store(true, Ordering::Relaxed);
    backoff.reset();
    tracing::info!("[Bridge] Connected, listening on {}", CHANNEL_PATTERN);

    let msg_stream = pubsub.into_on_message();
    tokio::pin!(msg_stream);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(BridgeCommand::Publish { channel, payload }) => {
                    publish_with_retry(&mut pub_conn, &channel, &payload, metrics).await;
                }
                None => {
                    metrics.connected.store(false, Ordering::Relaxed);
                    return Ok(());
                }
            },
            msg = msg_stream.next() => match msg {
                Some(msg) => {
                    metrics.received.fetch_add(1, Ordering::Relaxed);
                    let channel = msg.get_channel_name().to_string();
                    match msg.get_payload::<String>() {
                        Ok(payload) => handle_bridge_frame(fanout, &channel, &payload),
                        Err(e) => {
                            tracing::warn!("[Bridge] Undecodable payload on {}: {}", channel, e);
                        }
                    }
                }
                None => {
                    metrics.connected.store(false, Ordering::Relaxed);
                    return Err("subscription stream ended".to_string());
                }
            },
        }
    }
}

/// Outer reconnection loop with exponential backoff.
async fn listener_task(
    url: String,
    fanout: FanoutState,
    mut cmd_rx: mpsc::UnboundedReceiver<BridgeCommand>,
    metrics: Arc<BridgeMetrics>,
) {
    let mut backoff = ExponentialBackoff::new();
    loop {
        match connect_and_run(&url, &fanout, &mut cmd_rx, &metrics, &mut backoff).await {
            Ok(()) => {
                tracing::info!("[Bridge] Shut down");
                return;
            }
            Err(reason) => {
                metrics.reconnects.fetch_add(1, Ordering::Relaxed);
                let delay = backoff.next_delay();
                tracing::error!(
                    "[Bridge] Connection lost ({}), reconnecting in {:?}",
                    reason,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
