use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque rendezvous point shared by the two participants of a call.
///
/// Generated tokens are the 32 hex digits of a random v4 UUID.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomToken(String);

impl RoomToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Reads a token out of a shared link fragment (`#abc` or `abc`).
    /// An empty fragment yields `None`, in which case the caller generates one.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let token = fragment.trim().trim_start_matches('#');
        if token.is_empty() {
            return None;
        }
        Some(Self(token.to_owned()))
    }

    /// Draws a fresh token that is guaranteed to differ from `self`.
    pub fn regenerate(&self) -> Self {
        loop {
            let next = Self::generate();
            if next != *self {
                return next;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
