//! Line-oriented session loop with the delayed flip timer.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::Session;
use catmatch_core::{CatVisuals, PendingResolution, ResolutionTicket};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Everything the session loop reacts to.
enum Input {
    Line(String),
    Resolve(ResolutionTicket),
    Closed,
}

/// Run one session over a reader and writer until the input closes.
///
/// A flip still waiting on its timer when input closes is resolved before
/// returning. The writer is handed back once every message is flushed.
pub async fn run_session<R, W>(mut session: Session, reader: R, writer: W) -> anyhow::Result<W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Input>();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let send_task = tokio::spawn(write_messages(writer, out_rx));

    let line_tx = tx.clone();
    let read_task = tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line_tx.send(Input::Line(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Read error: {}", e);
                    break;
                }
            }
        }
        let _ = line_tx.send(Input::Closed);
    });

    info!("Session {} started", session.id);
    let _ = out_tx.send(ServerMessage::Welcome {
        session_id: session.id,
        visuals: CatVisuals::standard(),
    });
    if let Ok(messages) = session.handle(ClientMessage::GetState) {
        for msg in messages {
            let _ = out_tx.send(msg);
        }
    }

    let mut timer: Option<(ResolutionTicket, JoinHandle<()>)> = None;
    let mut closing = false;

    while let Some(input) = rx.recv().await {
        let messages = match input {
            Input::Line(line) if line.trim().is_empty() => continue,
            Input::Line(line) => match Session::parse(&line) {
                Ok(msg) => {
                    if msg == ClientMessage::NewGame {
                        if let Some((ticket, handle)) = timer.take() {
                            debug!(?ticket, "dropping timer for discarded board");
                            handle.abort();
                        }
                    }
                    match session.handle(msg) {
                        Ok(messages) => messages,
                        Err(e) => {
                            warn!("Rejected message from {}: {}", session.id, e);
                            vec![ServerMessage::Error {
                                message: e.to_string(),
                            }]
                        }
                    }
                }
                Err(e) => {
                    warn!("Invalid message from {}: {}", session.id, line);
                    vec![ServerMessage::Error {
                        message: e.to_string(),
                    }]
                }
            },
            Input::Resolve(ticket) => {
                if timer.as_ref().map(|(t, _)| *t) == Some(ticket) {
                    timer = None;
                }
                session.resolve(ticket)
            }
            Input::Closed => {
                closing = true;
                if timer.is_none() {
                    break;
                }
                continue;
            }
        };

        for msg in messages {
            let _ = out_tx.send(msg);
        }

        if let Some(pending) = session.pending() {
            if timer.as_ref().map(|(t, _)| *t) != Some(pending.ticket) {
                if let Some((_, handle)) = timer.take() {
                    handle.abort();
                }
                timer = Some((pending.ticket, schedule(tx.clone(), pending)));
            }
        }

        if closing && timer.is_none() {
            break;
        }
    }

    if let Some((_, handle)) = timer.take() {
        handle.abort();
    }
    read_task.abort();
    drop(out_tx);

    let writer = send_task.await??;
    info!("Session {} closed", session.id);
    Ok(writer)
}

/// Fire the pending flip's ticket back into the loop after its delay.
fn schedule(tx: mpsc::UnboundedSender<Input>, pending: PendingResolution) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(pending.delay_ms)).await;
        let _ = tx.send(Input::Resolve(pending.ticket));
    })
}

async fn write_messages<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) -> std::io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = rx.recv().await {
        match serde_json::to_string(&msg) {
            Ok(mut text) => {
                text.push('\n');
                writer.write_all(text.as_bytes()).await?;
                writer.flush().await?;
            }
            Err(e) => error!("Failed to encode message: {}", e),
        }
    }
    Ok(writer)
}
