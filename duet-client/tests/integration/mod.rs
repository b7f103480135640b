
use std::sync::Arc;

use duet_client::{NegotiationMachine, NegotiationState};
use duet_core::{IceCandidate, ParticipantRole};
use tracing::Level;

use crate::utils::{MockSignalingOutput, MockTransport};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn candidate(n: u32) -> IceCandidate {
    IceCandidate {
        candidate: format!("candidate:{} 1 udp 2122260223 10.0.0.{} 5000 typ host", n, n),
        sdp_mid: Some("0".to_owned()),
        sdp_m_line_index: Some(0),
    }
}

/// A machine for `role` with a bare mock transport already attached.
pub async fn create_test_machine(
    role: ParticipantRole,
    transport: MockTransport,
) -> (NegotiationMachine, Arc<MockTransport>, MockSignalingOutput) {
    let signaling = MockSignalingOutput::new_stored_only();
    let transport = Arc::new(transport);

    let mut machine = NegotiationMachine::new(Arc::new(signaling.clone()));
    machine.assign_role(role);
    machine.attach_transport(transport.clone()).await;
    assert_eq!(machine.state(), NegotiationState::AwaitingPeer);

    (machine, transport, signaling)
}
