mod config;
mod error;
mod media;
mod negotiation;
mod relay;
mod session;
mod transport;

pub use config::*;
pub use error::*;
pub use media::*;
pub use negotiation::*;
pub use relay::*;
pub use session::*;
pub use transport::*;
