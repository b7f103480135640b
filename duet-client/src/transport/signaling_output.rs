use async_trait::async_trait;
use duet_core::SignalingMessage;

/// Where the negotiation pushes messages meant for the other occupant.
///
/// Delivery is fire-and-forget: implementations log failures instead of returning them.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_signal(&self, msg: SignalingMessage);
}
