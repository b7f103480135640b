mod peer;
mod relay;
mod role;
mod room;
mod signaling;
#[cfg(not(target_arch = "wasm32"))]
mod webrtc_compat;

pub use peer::PeerId;
pub use relay::{RelayEvent, RelayRequest};
pub use role::{ParticipantRole, RendezvousResult};
pub use room::RoomToken;
pub use signaling::{IceCandidate, SdpKind, SessionDescription, SignalingMessage};
#[cfg(not(target_arch = "wasm32"))]
pub use webrtc_compat::UnsupportedSdpType;
