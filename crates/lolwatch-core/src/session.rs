// WebSocket session driver.
//
// A `Session` owns the single outbound connection for its whole lifetime. The
// socket lives in a spawned task that connects, sends the identity line once
// the connection is open, and forwards every transport event over an mpsc
// channel as a typed `SessionEvent`. Nothing is retried: when the connection
// ends the task emits `Closed` and exits.

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};

use crate::protocol::{CloseInfo, IdentityMessage, SessionEvent};

/// Capacity of the event channel between the driver task and its consumer.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session event receiver dropped")]
    ReceiverDropped,
}

// ---------------------------------------------------------------------------
// Session handle
// ---------------------------------------------------------------------------

/// An owned transport session.
///
/// Constructed with [`Session::open`] when the view mounts and disposed with
/// [`Session::dispose`] (or by dropping it) when the view unmounts.
pub struct Session {
    endpoint: String,
    events: mpsc::Receiver<SessionEvent>,
    task: JoinHandle<()>,
}

impl Session {
    /// Start connecting to `endpoint` in a background task.
    ///
    /// Must be called from within a tokio runtime. Connection failures are
    /// delivered as events, never returned here.
    pub fn open(endpoint: impl Into<String>, identity: IdentityMessage) -> Session {
        let endpoint = endpoint.into();
        let (tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let task_endpoint = endpoint.clone();
        let task = tokio::spawn(async move {
            if let Err(e) = run_session(&task_endpoint, &identity, &tx).await {
                debug!("Session driver for {task_endpoint} stopped: {e}");
            }
        });

        Session {
            endpoint,
            events,
            task,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wait for the next transport event. Returns `None` once the driver has
    /// emitted `Closed` and exited.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Tear the session down. Aborts the driver task, which drops the socket.
    pub fn dispose(self) {
        info!("Disposing session for {}", self.endpoint);
        // Drop aborts the task.
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Connect to `endpoint` and drive the session until it ends.
///
/// A failed handshake is reported as `Error` followed by an unclean
/// `Closed`. Returns `Err` only when the event receiver has been dropped.
pub async fn run_session(
    endpoint: &str,
    identity: &IdentityMessage,
    tx: &mpsc::Sender<SessionEvent>,
) -> Result<(), SessionError> {
    debug!("Connecting to {endpoint}");

    let ws_stream = match tokio_tungstenite::connect_async(endpoint).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            warn!("Connection to {endpoint} failed: {e}");
            emit(tx, SessionEvent::Error(e.to_string())).await?;
            emit(tx, SessionEvent::Closed(CloseInfo::abnormal())).await?;
            return Ok(());
        }
    };

    let (write, read) = ws_stream.split();
    drive(write, read, identity, tx).await
}

/// Drive an open session over any sink/stream pair.
///
/// Emits `Opened`, sends the identity line exactly once, then forwards text
/// frames as `Message` events until the stream ends. Always finishes with a
/// single `Closed` event: clean when a close frame was received, unclean
/// otherwise.
///
/// Generic over the sink and stream so it can be tested with in-memory
/// values without opening TCP ports.
pub async fn drive<Si, St>(
    mut write: Si,
    mut read: St,
    identity: &IdentityMessage,
    tx: &mpsc::Sender<SessionEvent>,
) -> Result<(), SessionError>
where
    Si: Sink<Message> + Unpin,
    Si::Error: std::fmt::Display,
    St: Stream<Item = Result<Message, WsError>> + Unpin,
{
    emit(tx, SessionEvent::Opened).await?;

    let wire = identity.to_wire();
    if let Err(e) = write.send(Message::text(wire)).await {
        warn!("Failed to send identity message: {e}");
        emit(tx, SessionEvent::Error(format!("failed to send identity: {e}"))).await?;
    }

    let mut close: Option<CloseInfo> = None;

    while let Some(msg_result) = read.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                if close.is_some() {
                    continue;
                }
                emit(tx, SessionEvent::Message(text.to_string())).await?;
            }
            Ok(Message::Close(frame)) => {
                debug!("Server sent close frame: {frame:?}");
                // Keep polling so the close reply is flushed; the stream
                // ends once the handshake completes.
                close.get_or_insert_with(|| CloseInfo::from_frame(frame.as_ref()));
            }
            Err(e) => {
                if close.is_none() {
                    emit(tx, SessionEvent::Error(e.to_string())).await?;
                }
                break;
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }

    let info = close.unwrap_or_else(CloseInfo::abnormal);
    emit(tx, SessionEvent::Closed(info)).await
}

async fn emit(tx: &mpsc::Sender<SessionEvent>, event: SessionEvent) -> Result<(), SessionError> {
    tx.send(event)
        .await
        .map_err(|_| SessionError::ReceiverDropped)
}
