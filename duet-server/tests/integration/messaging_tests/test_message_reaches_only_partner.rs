use duet_core::{IceCandidate, RelayEvent, SessionDescription, SignalingMessage};
use duet_server::RelayHub;

use crate::integration::init_tracing;
use crate::utils::TestPeer;

#[tokio::test]
async fn test_message_reaches_only_partner() {
    init_tracing();

    let hub = RelayHub::new();
    let mut alice = TestPeer::attach(&hub);
    let mut bob = TestPeer::attach(&hub);
    let mut outsider = TestPeer::attach(&hub);

    alice.create_or_join("abc");
    bob.create_or_join("abc");
    outsider.create_or_join("elsewhere");
    alice.pending_events();
    bob.pending_events();
    outsider.pending_events();

    let offer = SignalingMessage::Description(SessionDescription::offer("v=0"));
    alice.send(offer.clone());

    assert_eq!(
        bob.next_event().await,
        Some(RelayEvent::Message { payload: offer })
    );
    assert!(alice.pending_events().is_empty());
    assert!(outsider.pending_events().is_empty());
}

#[tokio::test]
async fn test_messages_keep_sender_order() {
    init_tracing();

    let hub = RelayHub::new();
    let alice = TestPeer::attach(&hub);
    let mut bob = TestPeer::attach(&hub);

    alice.create_or_join("abc");
    bob.create_or_join("abc");
    bob.pending_events();

    let candidates: Vec<SignalingMessage> = (0..3)
        .map(|i| {
            SignalingMessage::Candidate(IceCandidate {
                candidate: format!("candidate:{}", i),
                sdp_mid: Some("0".to_owned()),
                sdp_m_line_index: Some(0),
            })
        })
        .collect();

    for candidate in &candidates {
        alice.send(candidate.clone());
    }

    for expected in candidates {
        assert_eq!(
            bob.next_event().await,
            Some(RelayEvent::Message { payload: expected })
        );
    }
}

#[tokio::test]
async fn test_message_without_partner_is_dropped() {
    init_tracing();

    let hub = RelayHub::new();
    let mut alice = TestPeer::attach(&hub);

    alice.create_or_join("abc");
    alice.pending_events();

    alice.send(SignalingMessage::Bye);

    assert!(alice.pending_events().is_empty());
}
