use duet_core::{RelayEvent, RoomToken};
use duet_server::RelayHub;

use crate::integration::init_tracing;
use crate::utils::TestPeer;

#[tokio::test]
async fn test_third_peer_is_rejected() {
    init_tracing();

    let hub = RelayHub::new();
    let alice = TestPeer::attach(&hub);
    let bob = TestPeer::attach(&hub);
    let mut carol = TestPeer::attach(&hub);

    alice.create_or_join("abc");
    bob.create_or_join("abc");
    carol.create_or_join("abc");

    assert_eq!(
        carol.next_event().await,
        Some(RelayEvent::Full {
            room: RoomToken::new("abc"),
        })
    );
    assert_eq!(hub.rooms().occupancy(&RoomToken::new("abc")), 2);

    let fresh = RoomToken::new("abc").regenerate();
    carol.create_or_join(fresh.as_str());
    assert_eq!(
        carol.next_event().await,
        Some(RelayEvent::Created {
            room: fresh,
            peer_id: carol.peer_id,
        })
    );
}
