use crate::model::signaling::{IceCandidate, SdpKind, SessionDescription};
use std::fmt;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

impl From<IceCandidate> for RTCIceCandidateInit {
    fn from(c: IceCandidate) -> Self {
        RTCIceCandidateInit {
            candidate: c.candidate,
            sdp_mid: c.sdp_mid,
            sdp_mline_index: c.sdp_m_line_index,
            username_fragment: None,
        }
    }
}

impl From<RTCIceCandidateInit> for IceCandidate {
    fn from(init: RTCIceCandidateInit) -> Self {
        IceCandidate {
            candidate: init.candidate,
            sdp_mid: init.sdp_mid,
            sdp_m_line_index: init.sdp_mline_index,
        }
    }
}

impl TryFrom<SessionDescription> for RTCSessionDescription {
    type Error = webrtc::Error;

    fn try_from(desc: SessionDescription) -> Result<Self, Self::Error> {
        match desc.kind {
            SdpKind::Offer => RTCSessionDescription::offer(desc.sdp),
            SdpKind::Answer => RTCSessionDescription::answer(desc.sdp),
        }
    }
}

/// Raised for provisional answers and rollbacks, which never travel over the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedSdpType(pub RTCSdpType);

impl fmt::Display for UnsupportedSdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported sdp type: {}", self.0)
    }
}

impl std::error::Error for UnsupportedSdpType {}

impl TryFrom<RTCSessionDescription> for SessionDescription {
    type Error = UnsupportedSdpType;

    fn try_from(desc: RTCSessionDescription) -> Result<Self, Self::Error> {
        let kind = match desc.sdp_type {
            RTCSdpType::Offer => SdpKind::Offer,
            RTCSdpType::Answer => SdpKind::Answer,
            other => return Err(UnsupportedSdpType(other)),
        };
        Ok(SessionDescription {
            kind,
            sdp: desc.sdp,
        })
    }
}
