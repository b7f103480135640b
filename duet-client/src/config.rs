use crate::transport::TransportConfig;
use anyhow::Context;
use duet_core::RoomToken;
use std::env;
use std::time::Duration;

pub const DEFAULT_RELAY_URL: &str = "ws://127.0.0.1:3000/ws";
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub relay_url: String,
    /// Room to join; a random one is generated when absent.
    pub room: Option<RoomToken>,
    pub transport: TransportConfig,
    /// Measured from the `ready` signal. `None` waits forever.
    pub handshake_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_owned(),
            room: None,
            transport: TransportConfig::default(),
            handshake_timeout: Some(DEFAULT_HANDSHAKE_TIMEOUT),
        }
    }
}

impl SessionConfig {
    /// Overlays `DUET_RELAY_URL`, `DUET_ROOM`, `DUET_ICE_SERVERS` and
    /// `DUET_HANDSHAKE_TIMEOUT_SECS` (0 disables the timeout) on the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("DUET_RELAY_URL") {
            config.relay_url = url;
        }
        if let Ok(room) = env::var("DUET_ROOM") {
            config.room = RoomToken::from_fragment(&room);
        }
        config.transport = TransportConfig::from_env();
        if let Ok(secs) = env::var("DUET_HANDSHAKE_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("DUET_HANDSHAKE_TIMEOUT_SECS '{}' is not a number", secs))?;
            config.handshake_timeout = timeout_from_secs(secs);
        }

        Ok(config)
    }
}

pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
