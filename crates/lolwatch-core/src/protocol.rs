// Message types shared between the session driver, the live client, and the
// TUI: the outbound identity line, typed transport events, and UI updates.

use chrono::{DateTime, Local};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;

use crate::display::Region;

/// Separator between the fields of the identity line.
pub const IDENTITY_DELIMITER: char = ',';

/// Close code reported when the connection ends without a close frame
/// (RFC 6455 "abnormal closure").
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Close code reported for a close frame that carried no status
/// (RFC 6455 "no status received").
pub const NO_STATUS_RECEIVED: u16 = 1005;

// ---------------------------------------------------------------------------
// IdentityMessage
// ---------------------------------------------------------------------------

/// The single outbound payload: which summoner (and region) the client wants
/// a report for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMessage {
    pub summoner_name: String,
    pub region: String,
}

impl IdentityMessage {
    pub fn new(summoner_name: impl Into<String>, region: impl Into<String>) -> Self {
        IdentityMessage {
            summoner_name: summoner_name.into(),
            region: region.into(),
        }
    }

    /// Wire form: `"<summonerName>,<regionCode>"`.
    pub fn to_wire(&self) -> String {
        format!("{}{}{}", self.summoner_name, IDENTITY_DELIMITER, self.region)
    }
}

// ---------------------------------------------------------------------------
// Transport events
// ---------------------------------------------------------------------------

/// How the transport session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    /// True when a close frame was received before the connection ended.
    pub was_clean: bool,
    pub code: u16,
    pub reason: String,
}

impl CloseInfo {
    /// Close info for a received close frame.
    pub fn from_frame(frame: Option<&CloseFrame>) -> Self {
        match frame {
            Some(f) => CloseInfo {
                was_clean: true,
                code: u16::from(f.code),
                reason: f.reason.as_str().to_string(),
            },
            None => CloseInfo {
                was_clean: true,
                code: NO_STATUS_RECEIVED,
                reason: String::new(),
            },
        }
    }

    /// Diagnostic line for the close. Only a clean close carries the code
    /// and reason.
    pub fn describe(&self) -> String {
        if self.was_clean {
            format!(
                "Connection closed cleanly, code={} reason={}",
                self.code, self.reason
            )
        } else {
            "Connection died".to_string()
        }
    }

    /// Close info for a connection that died without a closing handshake.
    pub fn abnormal() -> Self {
        CloseInfo {
            was_clean: false,
            code: ABNORMAL_CLOSURE,
            reason: String::new(),
        }
    }
}

/// Events emitted by the session driver, in transport order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Handshake completed; the connection is open.
    Opened,
    /// A text frame was received (raw, unparsed).
    Message(String),
    /// A transport error occurred. May be followed by `Closed`.
    Error(String),
    /// The session ended. Always the last event.
    Closed(CloseInfo),
}

// ---------------------------------------------------------------------------
// UI messages
// ---------------------------------------------------------------------------

/// Updates pushed from the application loop to the TUI render loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Replace the rendered content of one region.
    RegionReplaced { region: Region, content: String },
    /// A report was rendered into all regions.
    ReportRendered { at: DateTime<Local> },
}

/// Commands sent from the TUI to the application loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

    #[test]
    fn identity_wire_format_is_comma_joined() {
        let msg = IdentityMessage::new("Faker", "KR");
        assert_eq!(msg.to_wire(), "Faker,KR");
    }

    #[test]
    fn identity_wire_format_keeps_spaces_inside_name() {
        let msg = IdentityMessage::new("Hide on bush", "KR");
        assert_eq!(msg.to_wire(), "Hide on bush,KR");
    }

    #[test]
    fn close_info_from_frame_is_clean() {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "bye".into(),
        };
        let info = CloseInfo::from_frame(Some(&frame));
        assert!(info.was_clean);
        assert_eq!(info.code, 1000);
        assert_eq!(info.reason, "bye");
    }

    #[test]
    fn close_info_without_status_is_clean_1005() {
        let info = CloseInfo::from_frame(None);
        assert!(info.was_clean);
        assert_eq!(info.code, NO_STATUS_RECEIVED);
        assert!(info.reason.is_empty());
    }

    #[test]
    fn clean_close_description_has_code_and_reason() {
        let info = CloseInfo {
            was_clean: true,
            code: 1000,
            reason: String::new(),
        };
        assert_eq!(info.describe(), "Connection closed cleanly, code=1000 reason=");
    }

    #[test]
    fn unclean_close_description_has_no_code() {
        let text = CloseInfo::abnormal().describe();
        assert_eq!(text, "Connection died");
        assert!(!text.contains("1006"));
    }

    #[test]
    fn abnormal_close_is_unclean() {
        let info = CloseInfo::abnormal();
        assert!(!info.was_clean);
        assert_eq!(info.code, ABNORMAL_CLOSURE);
    }
}
