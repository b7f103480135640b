use crate::room::{JoinOutcome, Room};
use dashmap::DashMap;
use duet_core::{PeerId, RoomToken};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a peer leaving its room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: RoomToken,
    /// The occupant left behind, who should be told the call is over.
    pub remaining: Option<PeerId>,
}

/// Token → occupants map shared by every connection handler.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomToken, Room>>,
    memberships: Arc<DashMap<PeerId, RoomToken>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `peer_id` in the room named by `token`.
    ///
    /// A peer occupies at most one room: callers `leave` first, so the partner left
    /// behind can be told.
    pub fn join(&self, token: &RoomToken, peer_id: PeerId) -> JoinOutcome {
        let outcome = self.rooms.entry(token.clone()).or_default().admit(peer_id);

        if outcome != JoinOutcome::Full {
            self.memberships.insert(peer_id, token.clone());
        }

        info!(
            "Room {} join by {}: {:?} ({} occupant(s))",
            token,
            peer_id,
            outcome,
            self.occupancy(token)
        );
        outcome
    }

    pub fn leave(&self, peer_id: &PeerId) -> Option<Departure> {
        let (_, token) = self.memberships.remove(peer_id)?;

        let mut remaining = None;
        let mut now_empty = false;
        if let Some(mut room) = self.rooms.get_mut(&token) {
            room.remove(peer_id);
            remaining = room.occupants().first().copied();
            now_empty = room.is_empty();
        }

        if now_empty {
            self.rooms.remove_if(&token, |_, room| room.is_empty());
            debug!("Room {} is empty and was dropped", token);
        }

        info!("Peer {} left room {}", peer_id, token);
        Some(Departure {
            room: token,
            remaining,
        })
    }

    pub fn partner_of(&self, peer_id: &PeerId) -> Option<PeerId> {
        let token = self.room_of(peer_id)?;
        self.rooms.get(&token)?.partner_of(peer_id)
    }

    pub fn room_of(&self, peer_id: &PeerId) -> Option<RoomToken> {
        self.memberships.get(peer_id).map(|entry| entry.value().clone())
    }

    pub fn occupancy(&self, token: &RoomToken) -> usize {
        self.rooms.get(token).map(|room| room.len()).unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
