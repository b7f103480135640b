use std::env;

/// Media transport settings.
///
/// No STUN/TURN servers by default: peers only reach each other over host and
/// reflexive paths they can discover without help.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub ice_servers: Vec<String>,
}

impl TransportConfig {
    /// Reads a comma separated server list from `DUET_ICE_SERVERS`.
    pub fn from_env() -> Self {
        let ice_servers = env::var("DUET_ICE_SERVERS")
            .map(|value| parse_server_list(&value))
            .unwrap_or_default();
        Self { ice_servers }
    }
}

pub(crate) fn parse_server_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .collect()
}
