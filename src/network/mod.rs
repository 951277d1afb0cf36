//! # Network Module
//!
//! Wireless link association and status.
//!
//! This module handles:
//! - The [`NetworkSession`] capability (connect once, poll status)
//! - The startup spin-wait until the link is up
//! - A Linux implementation that observes the OS-managed link ([`route`])
//!
//! Startup has no failure path: [`NetworkSession::connect`] returns only once
//! the link is associated, however long that takes. There is no reconnection
//! logic; callers poll [`NetworkSession::status`] and skip work while down.

pub mod route;

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use tracing::info;

pub use route::RouteProbeSession;

/// Association state of the wireless link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// Trait for wireless network association
#[async_trait]
pub trait NetworkSession: Send {
    /// Associate with `ssid`, blocking until the link is up
    ///
    /// Retries at a fixed interval with no timeout and no error path.
    async fn connect(&mut self, ssid: &str, password: &str);

    /// Current link state, without blocking
    fn status(&self) -> LinkState;

    /// Address assigned to this device, if associated
    fn current_address(&self) -> Option<IpAddr>;
}

/// Poll `session` every `retry_interval` until it reports `Connected`
///
/// Emits one progress line per failed poll and returns the number of polls
/// that found the link down.
pub async fn wait_for_link<S>(session: &S, retry_interval: Duration) -> u32
where
    S: NetworkSession + Sync + ?Sized,
{
    let mut retries = 0;
    while session.status() != LinkState::Connected {
        retries += 1;
        info!("Waiting for network association (attempt {})", retries);
        tokio::time::sleep(retry_interval).await;
    }

    match session.current_address() {
        Some(addr) => info!("Connected! IP Address: {}", addr),
        None => info!("Connected!"),
    }
    retries
}


#[cfg(test)]
mod tests {
    use super::mocks::MockLink;
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_immediately_when_connected() {
        let link = MockLink::new(LinkState::Connected);
        let start = Instant::now();

        let retries = wait_for_link(&link, Duration::from_millis(500)).await;

        assert_eq!(retries, 0);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_spins_at_fixed_interval() {
        let link = MockLink::connected_after(3);
        let start = Instant::now();

        let retries = wait_for_link(&link, Duration::from_millis(500)).await;

        assert_eq!(retries, 3);
        assert_eq!(link.polls(), 4);
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_blocks_until_associated() {
        let mut link = MockLink::connected_after(10);

        link.connect("Mobile", "secret").await;

        assert_eq!(link.status(), LinkState::Connected);
        assert_eq!(*link.connect_calls.lock().unwrap(), vec!["Mobile".to_string()]);
    }

    #[test]
    fn test_status_is_idempotent() {
        let link = MockLink::new(LinkState::Disconnected);
        assert_eq!(link.status(), link.status());

        link.set_state(LinkState::Connected);
        assert_eq!(link.status(), LinkState::Connected);
        assert_eq!(link.status(), LinkState::Connected);
    }

    #[test]
    fn test_address_only_when_connected() {
        let link = MockLink::new(LinkState::Disconnected);
        assert!(link.current_address().is_none());

        link.set_state(LinkState::Connected);
        assert!(link.current_address().is_some());
    }
}
