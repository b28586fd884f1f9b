// ── Runtime connection configuration ──
//
// Describes how to reach a broker's management interface. Never touches
// disk: the CLI builds a `ConsoleConfig` from its profile and flags.

use std::time::Duration;

use qmc_api::{Credentials, TransportConfig};
use url::Url;

/// Configuration for a single management console session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Broker management URL (e.g., `http://localhost:8080`).
    pub url: Url,
    /// Static HTTP basic credentials, if the broker requires them.
    pub credentials: Option<Credentials>,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Request timeout.
    pub timeout: Duration,
    /// How often `--watch` refreshes a panel.
    pub poll_interval: Duration,
}

impl ConsoleConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            insecure: false,
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            insecure: self.insecure,
            credentials: self.credentials.clone(),
        }
    }
}
