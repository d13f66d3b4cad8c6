//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` is the contiguous block of ports probed on every host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;
    /// Highest port of the well-known range.
    pub const WELL_KNOWN_MAX: u16 = 1023;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Check if this port is in the well-known range (1-1023).
    #[inline]
    pub const fn is_well_known(self) -> bool {
        self.0 <= Self::WELL_KNOWN_MAX
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port range")]
    Empty,
}

/// An inclusive range of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start.0 > end.0 {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// The well-known ports, 1 through 1023. This is the default scan range.
    pub const fn well_known() -> Self {
        Self {
            start: Port(Port::MIN),
            end: Port(Port::WELL_KNOWN_MAX),
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// Always false; a valid range holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Check whether `port` falls inside this range.
    pub const fn contains(&self, port: Port) -> bool {
        port.0 >= self.start.0 && port.0 <= self.end.0
    }

    /// Iterate over all ports in this range in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self::well_known()
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses "80" or "1-1023".
impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let parse = |part: &str| -> Result<Port, PortError> {
            let value: u16 = part
                .trim()
                .parse()
                .map_err(|_| PortError::InvalidFormat(part.to_string()))?;
            Port::try_from(value)
        };

        match s.split_once('-') {
            Some((start, end)) => Self::new(parse(start)?, parse(end)?),
            None => Ok(Self::single(parse(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_well_known_range() {
        let range = PortRange::well_known();
        assert_eq!(range.len(), 1023);
        assert_eq!(range.iter().next(), Port::new(1));
        assert_eq!(range.iter().last(), Port::new(1023));
        assert!(range.iter().all(Port::is_well_known));
    }

    #[test]
    fn test_range_parsing() {
        let range: PortRange = "20-25".parse().unwrap();
        assert_eq!(range.len(), 6);
        assert!(range.contains(Port::new(22).unwrap()));
        assert!(!range.contains(Port::new(26).unwrap()));

        let single: PortRange = "8080".parse().unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single.to_string(), "8080");
    }

    #[test]
    fn test_range_parsing_errors() {
        assert!(matches!("".parse::<PortRange>(), Err(PortError::Empty)));
        assert!(matches!("0-10".parse::<PortRange>(), Err(PortError::OutOfRange(0))));
        assert!(matches!(
            "100-50".parse::<PortRange>(),
            Err(PortError::InvalidRange(100, 50))
        ));
        assert!("ssh".parse::<PortRange>().is_err());
        assert!("1-2-3".parse::<PortRange>().is_err());
    }

    #[test]
    fn test_port_display_honors_width() {
        let port = Port::new(22).unwrap();
        assert_eq!(format!("[{port:>6}]"), "[    22]");
        assert_eq!(format!("[{port:<4}]"), "[22  ]");
        assert_eq!(port.to_string(), "22");
    }

    #[test]
    fn test_port_serde_rejects_zero() {
        assert!(serde_json::from_str::<Port>("0").is_err());
        assert_eq!(serde_json::from_str::<Port>("443").unwrap().as_u16(), 443);
    }
}
