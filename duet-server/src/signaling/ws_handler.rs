use crate::RelayHub;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use duet_core::{PeerId, RelayRequest};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<RelayHub>) -> impl IntoResponse {
    let peer_id = PeerId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, peer_id, hub))
}

async fn handle_socket(socket: WebSocket, peer_id: PeerId, hub: RelayHub) {
    info!("New WebSocket connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    hub.connect(peer_id, tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize relay event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let hub = hub.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<RelayRequest>(&text) {
                        Ok(request) => hub.handle_request(peer_id, request),
                        Err(e) => warn!("Invalid relay request from {}: {:?}", peer_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    hub.disconnect(&peer_id);
    info!("WebSocket disconnected: {}", peer_id);
}
