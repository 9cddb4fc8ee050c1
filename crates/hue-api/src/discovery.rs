// NUPnP bridge discovery
//
// Asks the Philips discovery registry which bridges have checked in from
// the caller's public address. An empty list means none did; falling back
// to mDNS or manual IP entry is up to the caller.

use reqwest::Method;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::executor::RequestExecutor;
use crate::models::{self, DiscoveredBridge};
use crate::transport::TransportConfig;

/// Public discovery endpoint.
pub const DISCOVERY_URL: &str = "https://discovery.meethue.com/";

/// Scan with a default transport: system TLS, no timeout.
pub async fn nupnp_scan() -> Result<Vec<DiscoveredBridge>, Error> {
    nupnp_scan_with(&TransportConfig::default()).await
}

/// Scan with a fresh client built from `transport`.
///
/// Use [`TransportConfig::for_discovery`] for the recommended bound.
pub async fn nupnp_scan_with(transport: &TransportConfig) -> Result<Vec<DiscoveredBridge>, Error> {
    DiscoveryClient::new(transport)?.scan().await
}

/// Discovery against a fixed endpoint, independent of any bridge client.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    executor: RequestExecutor,
}

impl DiscoveryClient {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_client(transport.build_client()?, DISCOVERY_URL)
    }

    /// Point discovery at another endpoint (mirrors, tests).
    pub fn with_client(http: reqwest::Client, endpoint: &str) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self {
            executor: RequestExecutor::new(http, endpoint, false),
        })
    }

    pub async fn scan(&self) -> Result<Vec<DiscoveredBridge>, Error> {
        let url = self.executor.api_root().clone();
        debug!(%url, "scanning for bridges");
        let request = self.executor.http().request(Method::GET, url);
        let resp = self.executor.send(request).await?;
        let bridges: Vec<DiscoveredBridge> = models::decode(resp.body)?;
        debug!(count = bridges.len(), "discovery finished");
        Ok(bridges)
    }
}
