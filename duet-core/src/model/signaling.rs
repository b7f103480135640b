use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

impl fmt::Display for SdpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdpKind::Offer => f.write_str("offer"),
            SdpKind::Answer => f.write_str("answer"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// One network path proposed by a peer, in the browser's JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex", default)]
    pub sdp_m_line_index: Option<u16>,
}

/// Payload relayed verbatim between the two occupants of a room.
///
/// On the wire the description kind doubles as the message type:
/// `{"type": "offer", "sdp": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "WireSignal", into = "WireSignal")]
pub enum SignalingMessage {
    Description(SessionDescription),
    Candidate(IceCandidate),
    Bye,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireSignal {
    Offer { sdp: String },
    Answer { sdp: String },
    Candidate(IceCandidate),
    Bye,
}

impl From<WireSignal> for SignalingMessage {
    fn from(wire: WireSignal) -> Self {
        match wire {
            WireSignal::Offer { sdp } => {
                SignalingMessage::Description(SessionDescription::offer(sdp))
            }
            WireSignal::Answer { sdp } => {
                SignalingMessage::Description(SessionDescription::answer(sdp))
            }
            WireSignal::Candidate(candidate) => SignalingMessage::Candidate(candidate),
            WireSignal::Bye => SignalingMessage::Bye,
        }
    }
}

impl From<SignalingMessage> for WireSignal {
    fn from(msg: SignalingMessage) -> Self {
        match msg {
            SignalingMessage::Description(SessionDescription {
                kind: SdpKind::Offer,
                sdp,
            }) => WireSignal::Offer { sdp },
            SignalingMessage::Description(SessionDescription {
                kind: SdpKind::Answer,
                sdp,
            }) => WireSignal::Answer { sdp },
            SignalingMessage::Candidate(candidate) => WireSignal::Candidate(candidate),
            SignalingMessage::Bye => WireSignal::Bye,
        }
    }
}

impl SignalingMessage {
    /// Short label used in logs; never includes SDP bodies.
    pub fn label(&self) -> &'static str {
        match self {
            SignalingMessage::Description(desc) => match desc.kind {
                SdpKind::Offer => "offer",
                SdpKind::Answer => "answer",
            },
            SignalingMessage::Candidate(_) => "candidate",
            SignalingMessage::Bye => "bye",
        }
    }
}
