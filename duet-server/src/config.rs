use std::env;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub listen_addr: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl RelayConfig {
    /// Reads `DUET_LISTEN_ADDR`, falling back to the default when unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(addr) = env::var("DUET_LISTEN_ADDR") {
            config.listen_addr = parse_listen_addr(&addr)?;
        }
        Ok(config)
    }
}

pub fn parse_listen_addr(addr: &str) -> anyhow::Result<SocketAddr> {
    addr.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("DUET_LISTEN_ADDR '{}' is not a socket address: {}", addr, e))
}
