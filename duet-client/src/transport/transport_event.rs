use duet_core::IceCandidate;

/// Events the media transport raises for the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A local candidate was discovered; `None` means gathering finished.
    CandidateGenerated(Option<IceCandidate>),

    /// A remote audio or video track started arriving.
    TrackReceived { kind: String, track_id: String },

    /// The peer-to-peer path is up.
    Connected,

    /// The connection failed and will not recover.
    Failed,

    /// The connection was closed underneath the session.
    Closed,
}
