//! WebSocket test-case server (SPEC_FULL.md §5 "Output", §9 decision),
//! reproducing the reference implementation's JSON status-driven dispatch
//! (`examples/original_source/dharma/core/websocket.py`) over `axum`'s `ws`
//! extractor instead of a hand-rolled frame parser.
//!
//! The engine's per-run mutable state is not re-entrant (SPEC_FULL.md §5), so
//! the session sits behind a `std::sync::Mutex` locked for the duration of
//! each inbound message rather than given its own task or cloned per
//! connection.

use crate::error::{CliError, Result};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use dharma_drv::DharmaSession;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct ServerState {
    session: Arc<Mutex<DharmaSession>>,
}

#[derive(Deserialize)]
struct StatusMessage {
    status: String,
}

pub async fn serve(session: DharmaSession, host: &str, port: u16) -> Result<()> {
    let state = ServerState { session: Arc::new(Mutex::new(session)) };
    let app = Router::new().route("/", get(ws_handler)).with_state(state);
    let addr = format!("{host}:{port}");
    tracing::info!(%addr, "listening for websocket connections");
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(CliError::Io)?;
    axum::serve(listener, app).await.map_err(|e| CliError::Server(e.to_string()))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One connection's message loop. Mirrors `websocket.py`'s `on_message`
/// exactly: an `"open"` status is logged, then either `"open"` or `"success"`
/// triggers a generated test case, `"closed"` logs closure, anything else is
/// an error.
async fn handle_socket(mut socket: WebSocket, state: ServerState) {
    while let Some(Ok(msg)) = socket.recv().await {
        let Message::Text(text) = msg else { continue };
        let status = serde_json::from_str::<StatusMessage>(&text).ok().map(|s| s.status);

        if status.as_deref() == Some("open") {
            tracing::info!("connection opened");
        }

        match status.as_deref() {
            Some("open") | Some("success") => {
                let content = { state.session.lock().unwrap().generate_testcase() };
                match content {
                    Ok(content) => {
                        if socket.send(Message::Text(content)).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::error!(%err, "failed to generate test case"),
                }
            }
            Some("closed") => tracing::info!("connection closed"),
            _ => tracing::error!(%text, "unrecognized status message"),
        }
    }
}
