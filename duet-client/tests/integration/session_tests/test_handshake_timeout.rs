use std::time::Duration;

use duet_client::{
    CloseReason, DEFAULT_HANDSHAKE_TIMEOUT, NegotiationState, SessionError, SessionOutcome,
    spawn_call,
};
use duet_core::{PeerId, RelayEvent, RelayRequest, RoomToken, SessionDescription, SignalingMessage};

use crate::integration::init_tracing;
use crate::utils::{MockMediaSource, MockTransportFactory, TransportCall, call_deps, scripted_link};

#[tokio::test(start_paused = true)]
async fn test_unanswered_offer_times_out() {
    init_tracing();

    let room = RoomToken::new("silent");
    let (link, mut relay) = scripted_link();
    relay
        .events
        .send(RelayEvent::Created {
            room: room.clone(),
            peer_id: PeerId::new(),
        })
        .unwrap();
    relay.events.send(RelayEvent::Ready).unwrap();

    let media = MockMediaSource::new();
    let transports = MockTransportFactory::new();
    let (handle, task) = spawn_call(
        room.clone(),
        link,
        call_deps(&media, &transports, Some(DEFAULT_HANDSHAKE_TIMEOUT)),
    );

    let outcome = task.await.unwrap();
    match outcome {
        SessionOutcome::Failed(SessionError::HandshakeTimeout(limit)) => {
            assert_eq!(limit, DEFAULT_HANDSHAKE_TIMEOUT)
        }
        other => panic!("expected a handshake timeout, got {:?}", other),
    }
    assert_eq!(handle.status().state, NegotiationState::Failed);
    assert_eq!(media.released(), 1);

    let transport = transports.created().await.remove(0);
    assert_eq!(transport.count(&TransportCall::Close).await, 1);

    assert_eq!(
        relay.requests.recv().await,
        Some(RelayRequest::CreateOrJoin { room })
    );
    assert!(matches!(
        relay.requests.recv().await,
        Some(RelayRequest::Message {
            payload: SignalingMessage::Description(_)
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_connected_session_outlives_the_timeout() {
    init_tracing();

    let room = RoomToken::new("chatty");
    let (link, mut relay) = scripted_link();
    relay
        .events
        .send(RelayEvent::Created {
            room: room.clone(),
            peer_id: PeerId::new(),
        })
        .unwrap();
    relay.events.send(RelayEvent::Ready).unwrap();

    let media = MockMediaSource::new();
    let transports = MockTransportFactory::new();
    let (mut handle, task) = spawn_call(
        room.clone(),
        link,
        call_deps(&media, &transports, Some(Duration::from_secs(10))),
    );

    handle
        .wait_for_state(NegotiationState::OfferSent, Duration::from_secs(1))
        .await
        .expect("no offer");
    relay
        .events
        .send(RelayEvent::Message {
            payload: SignalingMessage::Description(SessionDescription::answer("v=0")),
        })
        .unwrap();
    handle
        .wait_for_state(NegotiationState::Connected, Duration::from_secs(1))
        .await
        .expect("never connected");

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(handle.status().state, NegotiationState::Connected);

    assert!(handle.hangup().await);
    let outcome = task.await.unwrap();
    assert!(matches!(outcome, SessionOutcome::Closed(CloseReason::Local)));

    let mut saw_bye = false;
    while let Ok(request) = relay.requests.try_recv() {
        if request == (RelayRequest::Bye { room: room.clone() }) {
            saw_bye = true;
        }
    }
    assert!(saw_bye);
}
