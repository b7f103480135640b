mod room;
mod room_registry;

pub use room::*;
pub use room_registry::*;
