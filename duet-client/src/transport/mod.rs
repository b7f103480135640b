mod connection_wrapper;
mod media_transport;
mod signaling_output;
mod transport_config;
mod transport_event;

pub use connection_wrapper::{ConnectionWrapper, WebRtcTransportFactory};
pub use media_transport::{MediaTransport, MediaTransportFactory};
pub use signaling_output::SignalingOutput;
pub use transport_config::TransportConfig;
pub use transport_event::TransportEvent;
