// Shared transport configuration for building reqwest::Client instances.
//
// The bridge client, OAuth helper, and discovery helper all build their
// HTTP clients through this module so TLS and timeout policy live in one
// place. No timeout is applied unless the caller asks for one.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

/// Recommended upper bound for a NUPnP discovery call.
///
/// The public discovery service can be slow to answer; callers should treat
/// a scan that takes longer than this as timed out.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(8);

const USER_AGENT: &str = concat!("hue-api/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (local bridges serve a self-signed one).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request timeout. `None` leaves the call unbounded.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: None,
            user_agent: USER_AGENT.to_owned(),
        }
    }
}

impl TransportConfig {
    /// Transport preset for [`nupnp_scan_with`](crate::discovery::nupnp_scan_with):
    /// system TLS with the recommended [`DISCOVERY_TIMEOUT`].
    pub fn for_discovery() -> Self {
        Self::default().with_timeout(DISCOVERY_TIMEOUT)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a `reqwest::Client` with additional default headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .default_headers(headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_timeout() {
        let config = TransportConfig::default();
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("hue-api/"));
    }

    #[test]
    fn discovery_preset_uses_recommended_timeout() {
        let config = TransportConfig::for_discovery();
        assert_eq!(config.timeout, Some(Duration::from_secs(8)));
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let config =
            TransportConfig::default().with_tls(TlsMode::CustomCa("/nonexistent/ca.pem".into()));
        let err = config.build_client().err();
        assert!(matches!(err, Some(Error::Tls(_))), "got {err:?}");
    }
}
