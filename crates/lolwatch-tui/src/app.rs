// Application loop.
//
// Feeds transport events from the owned `Session` through the `LiveClient`
// and forwards every region replacement to the TUI render loop. Exits on the
// user's quit command and disposes the session on the way out.

use chrono::Local;
use tokio::sync::mpsc;
use tracing::info;

use lolwatch_core::client::{LiveClient, MessageOutcome};
use lolwatch_core::display::PendingRegions;
use lolwatch_core::protocol::{SessionEvent, UiUpdate, UserCommand};
use lolwatch_core::session::Session;

/// Run the application loop until the user quits.
///
/// Listens on two channels using `tokio::select!`:
/// 1. Transport events from the session
/// 2. User commands from the TUI
pub async fn run(
    mut session: Session,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
) -> anyhow::Result<()> {
    info!("Application event loop started for {}", session.endpoint());

    let mut client = LiveClient::new(PendingRegions::new());

    // Once the session has closed, stop polling it; the dashboard stays up
    // showing the last report until the user quits.
    let mut session_open = true;

    loop {
        tokio::select! {
            event = session.next_event(), if session_open => {
                match event {
                    Some(event) => handle_session_event(&mut client, event, &ui_tx).await,
                    None => {
                        info!("Session event stream ended");
                        session_open = false;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    session.dispose();
    info!(
        "Application event loop exiting after {} report(s)",
        client.reports_rendered()
    );
    Ok(())
}

/// Apply one session event and push any resulting region updates to the TUI.
async fn handle_session_event(
    client: &mut LiveClient<PendingRegions>,
    event: SessionEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    if client.handle(event) != Some(MessageOutcome::Rendered) {
        return;
    }

    for (region, content) in client.surface_mut().drain() {
        let _ = ui_tx
            .send(UiUpdate::RegionReplaced { region, content })
            .await;
    }
    let _ = ui_tx
        .send(UiUpdate::ReportRendered { at: Local::now() })
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lolwatch_core::client::ConnectionState;
    use lolwatch_core::display::Region;
    use lolwatch_core::protocol::CloseInfo;

    fn collect(rx: &mut mpsc::Receiver<UiUpdate>) -> Vec<UiUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    #[tokio::test]
    async fn rendered_report_pushes_five_regions_then_timestamp() {
        let mut client = LiveClient::new(PendingRegions::new());
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        handle_session_event(&mut client, SessionEvent::Opened, &ui_tx).await;
        handle_session_event(
            &mut client,
            SessionEvent::Message(r#"{"summonerProfile":{"level":500}}"#.into()),
            &ui_tx,
        )
        .await;

        let updates = collect(&mut ui_rx);
        assert_eq!(updates.len(), 6);
        assert_eq!(
            updates[0],
            UiUpdate::RegionReplaced {
                region: Region::SummonerProfile,
                content: "{\n  \"level\": 500\n}".into(),
            }
        );
        for update in &updates[1..5] {
            assert!(matches!(
                update,
                UiUpdate::RegionReplaced { content, .. } if content == "undefined"
            ));
        }
        assert!(matches!(updates[5], UiUpdate::ReportRendered { .. }));
    }

    #[tokio::test]
    async fn error_before_message_pushes_nothing() {
        let mut client = LiveClient::new(PendingRegions::new());
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        handle_session_event(&mut client, SessionEvent::Error("refused".into()), &ui_tx).await;
        handle_session_event(
            &mut client,
            SessionEvent::Closed(CloseInfo::abnormal()),
            &ui_tx,
        )
        .await;

        assert!(collect(&mut ui_rx).is_empty());
        assert_eq!(client.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn malformed_payload_pushes_nothing() {
        let mut client = LiveClient::new(PendingRegions::new());
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        handle_session_event(&mut client, SessionEvent::Opened, &ui_tx).await;
        handle_session_event(&mut client, SessionEvent::Message("<html>".into()), &ui_tx).await;

        assert!(collect(&mut ui_rx).is_empty());
        assert!(client.surface().is_empty());
    }

    #[tokio::test]
    async fn event_loop_handles_quit_command() {
        // Nothing listens on this port, so the session fails and closes on its own.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let session = Session::open(
            format!("ws://{addr}/ws"),
            lolwatch_core::protocol::IdentityMessage::new("Faker", "KR"),
        );
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, _ui_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run(session, cmd_rx, ui_tx));
        cmd_tx.send(UserCommand::Quit).await.unwrap();

        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn event_loop_exits_when_command_channel_closes() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let session = Session::open(
            format!("ws://{addr}/ws"),
            lolwatch_core::protocol::IdentityMessage::new("Faker", "KR"),
        );
        let (cmd_tx, cmd_rx) = mpsc::channel::<UserCommand>(16);
        let (ui_tx, _ui_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run(session, cmd_rx, ui_tx));
        drop(cmd_tx);

        assert!(handle.await.unwrap().is_ok());
    }
}
