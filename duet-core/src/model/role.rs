use serde::{Deserialize, Serialize};

/// Which side of the handshake a participant plays. Fixed at rendezvous time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// First occupant of the room; sends the offer once the room is ready.
    Initiator,
    /// Second occupant; waits for the offer and answers it.
    Responder,
}

/// Outcome of asking the relay to create or join a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendezvousResult {
    Created,
    Joined,
    Full,
}

impl RendezvousResult {
    pub fn role(self) -> Option<ParticipantRole> {
        match self {
            RendezvousResult::Created => Some(ParticipantRole::Initiator),
            RendezvousResult::Joined => Some(ParticipantRole::Responder),
            RendezvousResult::Full => None,
        }
    }
}
