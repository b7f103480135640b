use crate::error::ChannelError;
use crate::relay::SignalChannel;
use duet_core::{RelayEvent, RelayRequest, RoomToken};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// One participant's connection to the relay, as a pair of channels.
///
/// `connect` backs it with a WebSocket; `new` accepts any pair of channels,
/// which is how an in-process relay is attached.
pub struct RelayLink {
    requests: mpsc::UnboundedSender<RelayRequest>,
    events: mpsc::UnboundedReceiver<RelayEvent>,
}

impl RelayLink {
    pub fn new(
        requests: mpsc::UnboundedSender<RelayRequest>,
        events: mpsc::UnboundedReceiver<RelayEvent>,
    ) -> Self {
        Self { requests, events }
    }

    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let (socket, _) = connect_async(url)
            .await
            .map_err(|source| ChannelError::Connect {
                url: url.to_owned(),
                source,
            })?;
        info!("Connected to relay at {}", url);

        let (mut sink, mut stream) = socket.split();
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<RelayRequest>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<RelayEvent>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let json = match serde_json::to_string(&request) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize relay request: {}", e);
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(json.into())).await {
                    warn!("Failed to write to relay: {}", e);
                    break;
                }
            }
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<RelayEvent>(&text) {
                        Ok(event) => {
                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid relay event: {:?}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Relay connection error: {}", e);
                        break;
                    }
                }
            }
            debug!("Relay event stream ended");
        });

        Ok(Self::new(request_tx, event_rx))
    }

    pub fn send(&self, request: RelayRequest) -> Result<(), ChannelError> {
        self.requests
            .send(request)
            .map_err(|_| ChannelError::Closed)
    }

    /// Next event from the relay; `None` once the connection is gone.
    pub async fn recv(&mut self) -> Option<RelayEvent> {
        self.events.recv().await
    }

    /// Outbound pipe for signaling messages within `room`.
    pub fn signal_channel(&self, room: RoomToken) -> SignalChannel {
        SignalChannel::new(room, self.requests.clone())
    }
}
