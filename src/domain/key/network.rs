use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Blockchain network a key is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    NetA,
    NetB,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::NetA, Network::NetB];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::NetA => "net-a",
            Network::NetB => "net-b",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Unknown network '{0}', expected net-a or net-b")]
pub struct ParseNetworkError(String);

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "net-a" | "net_a" | "neta" | "a" => Ok(Network::NetA),
            "net-b" | "net_b" | "netb" | "b" => Ok(Network::NetB),
            _ => Err(ParseNetworkError(s.to_string())),
        }
    }
}

/// Connection settings of the key service for one network
#[derive(Clone)]
pub struct NetworkContext {
    pub base_url: String,
    pub bearer_token: String,
    pub quota: u64,
}

impl NetworkContext {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>, quota: u64) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
            quota,
        }
    }
}

impl fmt::Debug for NetworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkContext")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"<redacted>")
            .field("quota", &self.quota)
            .finish()
    }
}
