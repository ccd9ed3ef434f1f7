//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, InboundCommand, PlayerId, Username},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::{CoordinatorError, GameCoordinator},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub player_id: String,
    #[serde(default)]
    pub username: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> PlayerId (Domain Model)
    let player_id = PlayerId::new(query.player_id.clone()).map_err(|_| {
        tracing::warn!("Invalid player_id format: '{}'", query.player_id);
        StatusCode::BAD_REQUEST
    })?;
    let username = query
        .username
        .filter(|name| !name.trim().is_empty())
        .map(Username::new)
        .transpose()
        .map_err(|e| {
            tracing::warn!("Invalid username for '{}': {}", player_id, e);
            StatusCode::BAD_REQUEST
        })?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, player_id, username)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the channel closes, which happens when the connection is
/// unregistered (for example, superseded by a newer connection of the same player).
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    player_id: PlayerId,
    username: Option<Username>,
) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .coordinator
        .connect(connection_id, player_id.clone(), username, tx)
        .await;

    let (sender, mut receiver) = socket.split();
    let coordinator = state.coordinator.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id, text.as_str());
                    dispatch_text(&coordinator, connection_id, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push coordinator events to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.coordinator.disconnect(connection_id).await;
    tracing::debug!("Connection '{}' of '{}' closed", connection_id, player_id);
}

/// Parse a text frame and hand the command to the coordinator
async fn dispatch_text(coordinator: &GameCoordinator, connection_id: ConnectionId, text: &str) {
    let command = serde_json::from_str::<ClientMessage>(text)
        .map_err(|e| CoordinatorError::BadRequest(format!("malformed message: {e}")))
        .and_then(|message| {
            InboundCommand::try_from(message)
                .map_err(|e| CoordinatorError::BadRequest(e.to_string()))
        });

    match command {
        Ok(command) => coordinator.handle(connection_id, command).await,
        Err(error) => coordinator.report_error(connection_id, &error).await,
    }
}
