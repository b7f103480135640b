mod relay_hub;
mod ws_handler;

pub use relay_hub::*;
pub use ws_handler::*;
