use duet_client::{CloseReason, NegotiationState, SessionOutcome, spawn_call};
use duet_core::{ParticipantRole, RelayRequest, RoomToken};
use duet_server::RelayHub;

use crate::integration::init_tracing;
use crate::utils::{
    MockMediaSource, MockTransportFactory, TransportCall, WAIT, call_deps, eventually, hub_link,
};

#[tokio::test]
async fn test_two_party_call_connects_and_hangs_up() {
    init_tracing();

    let hub = RelayHub::new();
    let room = RoomToken::new("abc");

    let media_a = MockMediaSource::new();
    let transports_a = MockTransportFactory::new().with_local_candidates(2);
    let (_, link_a) = hub_link(&hub);
    let (mut a, task_a) = spawn_call(
        room.clone(),
        link_a,
        call_deps(&media_a, &transports_a, None),
    );

    let status = a
        .wait_for_state(NegotiationState::AwaitingPeer, WAIT)
        .await
        .expect("A never got its transport");
    assert_eq!(status.role, Some(ParticipantRole::Initiator));
    assert_eq!(status.token, room);

    let media_b = MockMediaSource::new();
    let transports_b = MockTransportFactory::new().with_local_candidates(2);
    let (_, link_b) = hub_link(&hub);
    let (mut b, task_b) = spawn_call(
        room.clone(),
        link_b,
        call_deps(&media_b, &transports_b, None),
    );

    let a_status = a
        .wait_for_state(NegotiationState::Connected, WAIT)
        .await
        .expect("A did not connect");
    let b_status = b
        .wait_for_state(NegotiationState::Connected, WAIT)
        .await
        .expect("B did not connect");
    assert_eq!(a_status.role, Some(ParticipantRole::Initiator));
    assert_eq!(b_status.role, Some(ParticipantRole::Responder));

    let ta = transports_a.created().await.remove(0);
    let tb = transports_b.created().await.remove(0);
    eventually(|| {
        let tb = tb.clone();
        async move { tb.applied_candidates().await.len() == 2 }
    })
    .await;
    eventually(|| {
        let ta = ta.clone();
        async move { ta.applied_candidates().await.len() == 2 }
    })
    .await;
    assert_eq!(
        tb.applied_candidates().await,
        vec!["candidate:t0-0".to_owned(), "candidate:t0-1".to_owned()]
    );

    assert!(a.hangup().await);

    let outcome_a = task_a.await.unwrap();
    let outcome_b = task_b.await.unwrap();
    assert!(matches!(outcome_a, SessionOutcome::Closed(CloseReason::Local)));
    assert!(matches!(outcome_b, SessionOutcome::Closed(CloseReason::Remote)));
    assert_eq!(a.status().state, NegotiationState::Closed);
    assert_eq!(b.status().state, NegotiationState::Closed);

    assert_eq!(media_a.acquired(), 1);
    assert_eq!(media_a.released(), 1);
    assert_eq!(media_b.acquired(), 1);
    assert_eq!(media_b.released(), 1);
    assert_eq!(ta.count(&TransportCall::Close).await, 1);
    assert_eq!(tb.count(&TransportCall::Close).await, 1);
}

#[tokio::test]
async fn test_remote_disconnect_closes_session() {
    init_tracing();

    let hub = RelayHub::new();
    let room = RoomToken::new("drop");

    let media_a = MockMediaSource::new();
    let transports = MockTransportFactory::new();
    let (_, link_a) = hub_link(&hub);
    let (mut a, task_a) = spawn_call(
        room.clone(),
        link_a,
        call_deps(&media_a, &transports, None),
    );
    a.wait_for_state(NegotiationState::AwaitingPeer, WAIT)
        .await
        .expect("A never got its transport");

    let (_, mut link_b) = hub_link(&hub);
    link_b
        .send(RelayRequest::CreateOrJoin { room: room.clone() })
        .unwrap();
    a.wait_for_state(NegotiationState::OfferSent, WAIT)
        .await
        .expect("A never offered");

    // B vanishes without a bye; the relay reports it as one.
    drop(link_b);

    let outcome = task_a.await.unwrap();
    assert!(matches!(outcome, SessionOutcome::Closed(CloseReason::Remote)));
    assert_eq!(media_a.released(), 1);
    eventually(|| {
        let hub = hub.clone();
        let room = room.clone();
        async move { hub.rooms().occupancy(&room) == 0 }
    })
    .await;
}
