use duet_core::PeerId;

/// A room never holds more than two occupants.
pub const ROOM_CAPACITY: usize = 2;

/// Occupants of one room, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct Room {
    occupants: Vec<PeerId>,
}

/// What happened when a peer tried to enter a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The room was empty; the caller is its first occupant.
    Created,
    /// The caller became the second occupant alongside `other`.
    Joined { other: PeerId },
    /// Both slots were already taken.
    Full,
}

impl Room {
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn occupants(&self) -> &[PeerId] {
        &self.occupants
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.occupants.contains(peer_id)
    }

    pub(crate) fn admit(&mut self, peer_id: PeerId) -> JoinOutcome {
        match self.occupants.as_slice() {
            [] => {
                self.occupants.push(peer_id);
                JoinOutcome::Created
            }
            [other] => {
                let other = *other;
                self.occupants.push(peer_id);
                JoinOutcome::Joined { other }
            }
            _ => JoinOutcome::Full,
        }
    }

    pub(crate) fn remove(&mut self, peer_id: &PeerId) -> bool {
        let before = self.occupants.len();
        self.occupants.retain(|p| p != peer_id);
        self.occupants.len() != before
    }

    /// The occupant that is not `peer_id`, if any.
    pub fn partner_of(&self, peer_id: &PeerId) -> Option<PeerId> {
        if !self.contains(peer_id) {
            return None;
        }
        self.occupants.iter().copied().find(|p| p != peer_id)
    }
}
