//! # Route Probe Session
//!
//! Link status on a Linux host where the OS owns Wi-Fi association
//! (wpa_supplicant, NetworkManager, ...).
//!
//! The link counts as up when the kernel has a route from a configured local
//! address to the collector. Connecting a UDP socket performs exactly that
//! route lookup without sending a packet, so a probe never blocks on the
//! network and never touches the collector.

use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;
use tracing::{debug, info};

use super::{wait_for_link, LinkState, NetworkSession};

/// Link observer that probes the route toward a target host
#[derive(Debug, Clone)]
pub struct RouteProbeSession {
    host: String,
    port: u16,
    retry_interval: Duration,
    /// Collector address; `None` until a host name has been resolved
    target: Option<SocketAddr>,
}

impl RouteProbeSession {
    /// Observe the link toward `host:port`
    ///
    /// A literal IP address is used as is. A host name is resolved once, by
    /// `connect`; until then the link reads as down.
    ///
    /// # Arguments
    ///
    /// * `host` - Collector host (IP address or name)
    /// * `port` - Collector port
    /// * `retry_interval` - Delay between probes while waiting in `connect`
    pub fn new(host: impl Into<String>, port: u16, retry_interval: Duration) -> Self {
        let host = host.into();
        let target = literal_addr(&host, port);
        Self {
            host,
            port,
            retry_interval,
            target,
        }
    }

    /// Observe the link toward an already known address
    pub fn with_target(target: SocketAddr, retry_interval: Duration) -> Self {
        Self {
            host: target.ip().to_string(),
            port: target.port(),
            retry_interval,
            target: Some(target),
        }
    }

    /// Collector address used for route lookups, once known
    pub fn target(&self) -> Option<SocketAddr> {
        self.target
    }

    /// Local address the kernel would use to reach the target
    fn probe(&self) -> Option<IpAddr> {
        let target = self.target?;

        let unspecified: IpAddr = match target {
            SocketAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
            SocketAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
        };

        let socket = match UdpSocket::bind((unspecified, 0)) {
            Ok(socket) => socket,
            Err(e) => {
                debug!("Probe socket bind failed: {}", e);
                return None;
            }
        };

        if let Err(e) = socket.connect(target) {
            debug!("No route to {}: {}", target, e);
            return None;
        }

        match socket.local_addr() {
            Ok(local) if !local.ip().is_unspecified() => Some(local.ip()),
            Ok(_) => None,
            Err(e) => {
                debug!("Probe local_addr failed: {}", e);
                None
            }
        }
    }
}

/// `host` as a literal IP address, skipping DNS
fn literal_addr(host: &str, port: u16) -> Option<SocketAddr> {
    host.parse::<IpAddr>().ok().map(|ip| SocketAddr::new(ip, port))
}

/// Blocking name lookup; only called from `connect`
fn resolve(host: &str, port: u16) -> Option<SocketAddr> {
    use std::net::ToSocketAddrs;

    match (host, port).to_socket_addrs() {
        Ok(mut addrs) => addrs.next(),
        Err(e) => {
            debug!("Failed to resolve {}: {}", host, e);
            None
        }
    }
}

#[async_trait]
impl NetworkSession for RouteProbeSession {
    async fn connect(&mut self, ssid: &str, _password: &str) {
        // Credentials belong to the OS supplicant on a host; only observe here
        info!("Connecting to WiFi network {}", ssid);

        while self.target.is_none() {
            match resolve(&self.host, self.port) {
                Some(addr) => {
                    debug!("Resolved {} to {}", self.host, addr);
                    self.target = Some(addr);
                }
                None => tokio::time::sleep(self.retry_interval).await,
            }
        }

        wait_for_link(&*self, self.retry_interval).await;
    }

    fn status(&self) -> LinkState {
        match self.probe() {
            Some(_) => LinkState::Connected,
            None => LinkState::Disconnected,
        }
    }

    fn current_address(&self) -> Option<IpAddr> {
        self.probe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_session() -> RouteProbeSession {
        RouteProbeSession::with_target(
            SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 5000),
            Duration::from_millis(500),
        )
    }

    #[test]
    fn test_loopback_is_connected() {
        let session = loopback_session();
        assert_eq!(session.status(), LinkState::Connected);
        assert_eq!(session.current_address(), Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    }

    #[test]
    fn test_status_is_idempotent() {
        let session = loopback_session();
        let first = session.status();
        let second = session.status();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unresolved_name_is_disconnected() {
        // Names are resolved by connect only; status never does a lookup
        let session = RouteProbeSession::new("collector.invalid", 5000, Duration::from_millis(500));
        assert_eq!(session.target(), None);
        assert_eq!(session.status(), LinkState::Disconnected);
        assert!(session.current_address().is_none());
    }

    #[test]
    fn test_literal_host_needs_no_resolution() {
        let session = RouteProbeSession::new("127.0.0.1", 5000, Duration::from_millis(500));
        assert_eq!(session.target(), Some("127.0.0.1:5000".parse().unwrap()));
        assert_eq!(session.status(), LinkState::Connected);
    }

    #[test]
    fn test_literal_parsing() {
        assert_eq!(
            literal_addr("10.136.239.151", 5000),
            Some("10.136.239.151:5000".parse().unwrap())
        );
        assert_eq!(literal_addr("collector.local", 5000), None);
    }

    #[tokio::test]
    async fn test_connect_returns_when_route_exists() {
        let mut session = loopback_session();
        session.connect("Mobile", "secret").await;
        assert_eq!(session.status(), LinkState::Connected);
    }
}
