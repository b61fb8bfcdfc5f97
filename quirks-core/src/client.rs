//! Requester identity

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a requester, used only as a map key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientKey(String);

impl ClientKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key shared by requests whose origin could not be determined
    pub fn unknown() -> Self {
        Self::new("unknown")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ClientKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<IpAddr> for ClientKey {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn from_ip_uses_canonical_text() {
        let key = ClientKey::from(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)));
        assert_eq!(key.as_str(), "1.2.3.4");
        assert_eq!(key, ClientKey::from("1.2.3.4"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&ClientKey::new("10.0.0.1")).unwrap();
        assert_eq!(json, "\"10.0.0.1\"");
    }
}
