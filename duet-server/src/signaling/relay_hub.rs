use crate::room::{JoinOutcome, RoomRegistry};
use dashmap::DashMap;
use duet_core::{PeerId, RelayEvent, RelayRequest, RoomToken, SignalingMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct RelayInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<RelayEvent>>,
    rooms: RoomRegistry,
}

/// Routes relay requests between connected peers.
///
/// Transport-agnostic: the WebSocket handler feeds it, and so can an in-process test harness.
#[derive(Clone)]
pub struct RelayHub {
    inner: Arc<RelayInner>,
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RelayInner {
                peers: DashMap::new(),
                rooms: RoomRegistry::new(),
            }),
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.inner.rooms
    }

    pub fn connect(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<RelayEvent>) {
        debug!("Peer {} connected to relay", peer_id);
        self.inner.peers.insert(peer_id, tx);
    }

    /// Convenience for in-process peers: registers a fresh id and returns its event stream.
    pub fn attach(&self) -> (PeerId, mpsc::UnboundedReceiver<RelayEvent>) {
        let peer_id = PeerId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connect(peer_id, tx);
        (peer_id, rx)
    }

    /// Drops the peer and, if it was in a call, tells the other occupant it is over.
    pub fn disconnect(&self, peer_id: &PeerId) {
        self.depart(peer_id);
        self.inner.peers.remove(peer_id);
        debug!("Peer {} disconnected from relay", peer_id);
    }

    pub fn handle_request(&self, peer_id: PeerId, request: RelayRequest) {
        match request {
            RelayRequest::CreateOrJoin { room } => self.create_or_join(peer_id, room),
            RelayRequest::Message { payload } => self.forward(peer_id, payload),
            RelayRequest::Bye { room } => {
                if self.inner.rooms.room_of(&peer_id).as_ref() != Some(&room) {
                    debug!("Ignoring bye from {} for room {} it is not in", peer_id, room);
                    return;
                }
                info!("Peer {} said bye to room {}", peer_id, room);
                self.depart(&peer_id);
            }
        }
    }

    fn create_or_join(&self, peer_id: PeerId, room: RoomToken) {
        self.log(
            &peer_id,
            format!("Received request to create or join room {}", room),
        );

        self.depart(&peer_id);

        match self.inner.rooms.join(&room, peer_id) {
            JoinOutcome::Created => {
                self.log(&peer_id, format!("Client ID {} created room {}", peer_id, room));
                self.send_event(&peer_id, RelayEvent::Created { room, peer_id });
            }
            JoinOutcome::Joined { other } => {
                self.log(&peer_id, format!("Client ID {} joined room {}", peer_id, room));
                self.send_event(&peer_id, RelayEvent::Joined { room, peer_id });
                self.send_event(&other, RelayEvent::Ready);
                self.send_event(&peer_id, RelayEvent::Ready);
            }
            JoinOutcome::Full => {
                self.send_event(&peer_id, RelayEvent::Full { room });
            }
        }
    }

    fn forward(&self, from: PeerId, payload: SignalingMessage) {
        let Some(to) = self.inner.rooms.partner_of(&from) else {
            warn!(
                "Dropping {} from {}: no other occupant in its room",
                payload.label(),
                from
            );
            return;
        };
        debug!("Relaying {} from {} to {}", payload.label(), from, to);
        self.send_event(&to, RelayEvent::Message { payload });
    }

    fn depart(&self, peer_id: &PeerId) {
        let Some(departure) = self.inner.rooms.leave(peer_id) else {
            return;
        };
        if let Some(remaining) = departure.remaining {
            info!(
                "Notifying {} that {} left room {}",
                remaining, peer_id, departure.room
            );
            self.send_event(
                &remaining,
                RelayEvent::Message {
                    payload: SignalingMessage::Bye,
                },
            );
        }
    }

    fn log(&self, peer_id: &PeerId, line: String) {
        debug!("[relay -> {}] {}", peer_id, line);
        self.send_event(
            peer_id,
            RelayEvent::Log {
                entries: vec!["Message from server:".to_owned(), line],
            },
        );
    }

    pub fn send_event(&self, peer_id: &PeerId, event: RelayEvent) {
        let Some(peer) = self.inner.peers.get(peer_id) else {
            warn!("Attempted to send relay event to disconnected peer {}", peer_id);
            return;
        };
        if peer.send(event).is_err() {
            warn!("Relay event channel for {} is closed", peer_id);
        }
    }
}
