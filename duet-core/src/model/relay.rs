use crate::model::peer::PeerId;
use crate::model::room::RoomToken;
use crate::model::signaling::SignalingMessage;
use serde::{Deserialize, Serialize};

/// Requests a participant sends to the relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum RelayRequest {
    CreateOrJoin { room: RoomToken },
    Message { payload: SignalingMessage },
    Bye { room: RoomToken },
}

/// Events the relay pushes to a participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum RelayEvent {
    Created { room: RoomToken, peer_id: PeerId },
    Joined { room: RoomToken, peer_id: PeerId },
    Ready,
    Full { room: RoomToken },
    Message { payload: SignalingMessage },
    Log { entries: Vec<String> },
}
