//! TCP connect prober.
//!
//! Performs standard TCP connect attempts using the operating system's
//! socket API. The full handshake is the success signal; the stream is
//! dropped immediately afterwards.

use crate::error::ProbeError;
use crate::scanner::traits::Prober;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect prober.
///
/// Does not require elevated privileges.
#[derive(Debug, Clone)]
pub struct TcpConnectProber {
    timeout: Duration,
}

impl TcpConnectProber {
    /// Create a prober whose every attempt gives up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Attempt to connect to the target address.
    async fn attempt_connect(&self, addr: SocketAddr) -> Result<TcpStream, ProbeError> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(classify(addr, e)),
            Err(_) => Err(ProbeError::Timeout),
        }
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, addr: SocketAddr) -> bool {
        match self.attempt_connect(addr).await {
            Ok(stream) => {
                drop(stream);
                true
            }
            Err(e) => {
                trace!(%addr, error = %e, "probe failed");
                false
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn classify(addr: SocketAddr, e: std::io::Error) -> ProbeError {
    if e.kind() == std::io::ErrorKind::ConnectionRefused {
        return ProbeError::ConnectionRefused;
    }

    let error_str = e.to_string().to_lowercase();
    if error_str.contains("unreachable") {
        if error_str.contains("host") {
            ProbeError::HostUnreachable
        } else {
            ProbeError::NetworkUnreachable(e.to_string())
        }
    } else {
        ProbeError::ConnectionFailed {
            port: addr.port(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::{Ipv4Addr, SocketAddrV4};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_probe_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let prober = TcpConnectProber::new(Duration::from_secs(1));
        assert!(prober.probe(addr).await);
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        // Bind then drop to get a port nobody listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let prober = TcpConnectProber::new(Duration::from_millis(200));
        assert!(!prober.probe(addr).await);
    }

    #[test]
    fn test_classify() {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 22));

        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert!(matches!(classify(addr, refused), ProbeError::ConnectionRefused));

        let host = io::Error::new(io::ErrorKind::Other, "No route to host: host unreachable");
        assert!(matches!(classify(addr, host), ProbeError::HostUnreachable));

        let other = io::Error::new(io::ErrorKind::Other, "connection reset");
        assert!(matches!(
            classify(addr, other),
            ProbeError::ConnectionFailed { port: 22, .. }
        ));
    }
}
