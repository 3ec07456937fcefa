// Live session display client: applies transport events to a display
// surface and writes the lifecycle diagnostics.

use tracing::{debug, info, warn};

use crate::display::{project_report, DisplaySurface, Region};
use crate::protocol::{CloseInfo, SessionEvent};
use crate::report::{ReportError, SessionReport};

/// Lifecycle of the single transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Errored,
    Closed,
}

impl ConnectionState {
    /// Whether moving from `self` to `next` is allowed. There is no way back
    /// to `Connecting`, and `Closed` is final.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Connecting, Open)
                | (Connecting, Errored)
                | (Open, Errored)
                | (Open, Closed)
                | (Errored, Errored)
                | (Errored, Closed)
                // A refused handshake closes straight from Connecting.
                | (Connecting, Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == ConnectionState::Closed
    }
}

/// What handling an inbound message did to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// All five regions were replaced.
    Rendered,
    /// The message could not be used; the display is unchanged.
    Ignored,
}

/// The display client. Owns the display surface and tracks the connection
/// state from the events it is fed.
pub struct LiveClient<S> {
    state: ConnectionState,
    surface: S,
    reports_rendered: usize,
}

impl<S: DisplaySurface> LiveClient<S> {
    pub fn new(surface: S) -> Self {
        LiveClient {
            state: ConnectionState::Connecting,
            surface,
            reports_rendered: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn reports_rendered(&self) -> usize {
        self.reports_rendered
    }

    /// Dispatch one transport event to its handler. Returns the message
    /// outcome for `Message` events, `None` for everything else.
    pub fn handle(&mut self, event: SessionEvent) -> Option<MessageOutcome> {
        match event {
            SessionEvent::Opened => {
                self.on_open();
                None
            }
            SessionEvent::Message(raw) => Some(self.on_message(&raw)),
            SessionEvent::Error(err) => {
                self.on_error(&err);
                None
            }
            SessionEvent::Closed(info) => {
                self.on_close(&info);
                None
            }
        }
    }

    pub fn on_open(&mut self) {
        if self.transition(ConnectionState::Open) {
            info!("[open] Connection established");
            info!("Sending data to server");
        }
    }

    pub fn on_message(&mut self, raw: &str) -> MessageOutcome {
        info!("[message] Data received from server: {raw}");
        if self.state.is_terminal() {
            warn!("[message] Received after close, ignoring");
            return MessageOutcome::Ignored;
        }
        if self.state == ConnectionState::Connecting {
            warn!("[message] Received before open, ignoring");
            return MessageOutcome::Ignored;
        }

        match SessionReport::parse(raw) {
            Ok(report) => {
                debug!(
                    "[message] Report carries {} of {} sections",
                    report.present_count(),
                    Region::ALL.len()
                );
                project_report(&report, &mut self.surface);
                self.reports_rendered += 1;
                MessageOutcome::Rendered
            }
            Err(ReportError::Server(detail)) => {
                warn!("[message] Server error: {detail}");
                MessageOutcome::Ignored
            }
            Err(e) => {
                warn!("[message] Malformed payload: {e}");
                MessageOutcome::Ignored
            }
        }
    }

    pub fn on_close(&mut self, close: &CloseInfo) {
        if !self.transition(ConnectionState::Closed) {
            return;
        }
        if close.was_clean {
            info!("[close] {}", close.describe());
        } else {
            warn!("[close] {}", close.describe());
        }
    }

    pub fn on_error(&mut self, err: &str) {
        warn!("[error] {err}");
        self.transition(ConnectionState::Errored);
    }

    fn transition(&mut self, next: ConnectionState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            warn!(
                "Ignoring invalid connection transition {:?} -> {:?}",
                self.state, next
            );
            false
        }
    }
}
