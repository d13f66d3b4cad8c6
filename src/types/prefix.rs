//! Network prefix parsing.
//!
//! A `NetworkPrefix` is the first three octets of an IPv4 address. The sweep
//! always covers host octets 1-255 under it, whatever mask the user typed.

use ipnetwork::Ipv4Network;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use tracing::warn;

/// The fixed leading three octets of a /24 host range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkPrefix([u8; 3]);

impl NetworkPrefix {
    /// Lowest host octet visited by a sweep.
    pub const FIRST_HOST: u8 = 1;
    /// Highest host octet visited by a sweep.
    pub const LAST_HOST: u8 = 255;
    /// Number of candidate hosts under one prefix.
    pub const HOST_COUNT: usize = (Self::LAST_HOST - Self::FIRST_HOST) as usize + 1;

    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Self([a, b, c])
    }

    pub const fn octets(&self) -> [u8; 3] {
        self.0
    }

    /// Build the address of `host` under this prefix. Host octet 0 is the
    /// network address and is never a candidate.
    pub fn host(&self, host: u8) -> Option<Ipv4Addr> {
        if host < Self::FIRST_HOST {
            return None;
        }
        let [a, b, c] = self.0;
        Some(Ipv4Addr::new(a, b, c, host))
    }

    /// All candidate host addresses in ascending host-octet order.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        (Self::FIRST_HOST..=Self::LAST_HOST).filter_map(|h| self.host(h))
    }

    /// Check whether `addr` lies under this prefix.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        addr.octets()[..3] == self.0
    }
}

impl From<Ipv4Addr> for NetworkPrefix {
    fn from(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self([a, b, c])
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}.{b}.{c}.0/24")
    }
}

impl Serialize for NetworkPrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error type for prefix parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrefixError {
    #[error("empty network prefix")]
    Empty,
    #[error("invalid network prefix '{0}': expected three octets followed by a dot, e.g. 192.168.1.0/24")]
    MissingOctets(String),
    #[error("invalid octet '{octet}' in network prefix '{input}'")]
    InvalidOctet { input: String, octet: String },
    #[error("invalid host part '{host}' in '{input}'")]
    InvalidHost { input: String, host: String },
    #[error("invalid CIDR notation '{input}': {reason}")]
    InvalidCidr { input: String, reason: String },
}

/// Parses the text a user types at the prompt.
///
/// Everything after the last dot is the host part and is discarded. It must
/// still be empty, a host octet, or `octet/len`. A mask other than /24 is
/// accepted but not honored.
impl FromStr for NetworkPrefix {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(PrefixError::Empty);
        }

        let (head, host) = input
            .rsplit_once('.')
            .ok_or_else(|| PrefixError::MissingOctets(input.to_string()))?;

        let parts: Vec<&str> = head.split('.').collect();
        if parts.len() != 3 {
            return Err(PrefixError::MissingOctets(input.to_string()));
        }

        let mut octets = [0u8; 3];
        for (slot, part) in octets.iter_mut().zip(&parts) {
            *slot = parse_octet(part).ok_or_else(|| PrefixError::InvalidOctet {
                input: input.to_string(),
                octet: part.to_string(),
            })?;
        }

        if host.contains('/') {
            let network: Ipv4Network =
                input.parse().map_err(|e: ipnetwork::IpNetworkError| {
                    PrefixError::InvalidCidr {
                        input: input.to_string(),
                        reason: e.to_string(),
                    }
                })?;
            if network.prefix() != 24 {
                warn!(
                    input,
                    mask = network.prefix(),
                    "subnet mask ignored, sweeping hosts 1-255 of the /24"
                );
            }
        } else if !host.is_empty() && parse_octet(host).is_none() {
            return Err(PrefixError::InvalidHost {
                input: input.to_string(),
                host: host.to_string(),
            });
        }

        Ok(Self(octets))
    }
}

/// Decimal octet, digits only.
fn parse_octet(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
