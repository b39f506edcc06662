use crate::model::ws::{ClientMessage, ServerMessage};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use kernel::model::id::EventId;
use registry::AppRegistry;
use std::{collections::HashMap, sync::Arc};
use tokio::{
    sync::{broadcast::error::RecvError, Mutex},
    task::JoinHandle,
};

pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(registry): State<AppRegistry>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// One task per subscribed room forwards broadcast messages to this socket.
/// The socket's own read loop only manages room membership.
async fn handle_socket(socket: WebSocket, registry: AppRegistry) {
    let (sender, mut receiver) = socket.split();
    let sender = Arc::new(Mutex::new(sender));
    let mut rooms: HashMap<EventId, JoinHandle<()>> = HashMap::new();

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => {
                let Ok(client_message) = serde_json::from_str::<ClientMessage>(&text) else {
                    tracing::debug!("ignoring malformed client message: {text}");
                    continue;
                };
                match client_message {
                    ClientMessage::JoinEvent { event_id } => {
                        if rooms.contains_key(&event_id) {
                            continue;
                        }
                        let rx = registry.broadcaster().subscribe(event_id);
                        let handle = tokio::spawn(forward_room(rx, Arc::clone(&sender)));
                        rooms.insert(event_id, handle);
                    }
                    ClientMessage::LeaveEvent { event_id } => {
                        if let Some(handle) = rooms.remove(&event_id) {
                            handle.abort();
                        }
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    for handle in rooms.into_values() {
        handle.abort();
    }
}

async fn forward_room(
    mut rx: tokio::sync::broadcast::Receiver<kernel::realtime::RealtimeMessage>,
    sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
) {
    loop {
        match rx.recv().await {
            Ok(message) => {
                let server_message = ServerMessage::from(message);
                let Ok(payload) = serde_json::to_string(&server_message) else {
                    continue;
                };
                if sender
                    .lock()
                    .await
                    .send(Message::Text(payload))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("websocket subscriber lagged, skipped {skipped} messages");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
