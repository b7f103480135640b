mod relay_link;
mod rendezvous;
mod signal_channel;

pub use relay_link::RelayLink;
pub use rendezvous::RoomRendezvous;
pub use signal_channel::SignalChannel;
