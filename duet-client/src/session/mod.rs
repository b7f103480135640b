mod handle;
mod lifecycle;
mod session;

pub use handle::{Notice, SessionCommand, SessionHandle, SessionStatus};
pub use lifecycle::{CallDeps, spawn_call, start_call};
pub use session::{CloseReason, Session, SessionOutcome};

pub(crate) use handle::SessionControl;
