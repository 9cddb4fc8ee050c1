// Bridge resource client
//
// Binds a connection mode and one set of credentials to a request
// executor. The path prefix and header set are resolved once, at
// construction, so a misconfigured client fails before any network I/O.
// Endpoint groups (lights, other resources) are inherent methods in
// sibling files.

use std::borrow::Cow;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::{self, ConnectionMode, Credentials};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::executor::RequestExecutor;
use crate::models::{self, ApiResponse, DiscoveredBridge};
use crate::transport::TransportConfig;

/// Async client for one Hue bridge, remote or local.
///
/// Immutable after construction and safe to share across tasks; every call
/// issues exactly one request.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    executor: RequestExecutor,
    mode: ConnectionMode,
    prefix: String,
    username: String,
    headers: HeaderMap,
}

impl BridgeClient {
    /// Build a client with its own `reqwest::Client` from `transport`.
    pub fn new(
        config: &ClientConfig,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let (prefix, headers) = Self::resolve(config, credentials)?;
        let http = transport.build_client()?;
        Ok(Self::assemble(http, config, credentials, prefix, headers))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        config: &ClientConfig,
        credentials: &Credentials,
    ) -> Result<Self, Error> {
        let (prefix, headers) = Self::resolve(config, credentials)?;
        Ok(Self::assemble(http, config, credentials, prefix, headers))
    }

    fn resolve(
        config: &ClientConfig,
        credentials: &Credentials,
    ) -> Result<(String, HeaderMap), Error> {
        let prefix = auth::resolve_prefix(
            config.mode,
            credentials.bridge_id.as_deref(),
            &credentials.username,
        )?;
        let headers = auth::build_headers(config.mode, credentials.access_token.as_ref())?;
        Ok((prefix, headers))
    }

    fn assemble(
        http: reqwest::Client,
        config: &ClientConfig,
        credentials: &Credentials,
        prefix: String,
        headers: HeaderMap,
    ) -> Self {
        Self {
            executor: RequestExecutor::new(http, config.api_root.clone(), config.strict_status),
            mode: config.mode,
            prefix,
            username: credentials.username.clone(),
            headers,
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    /// Resolved path prefix, e.g. `/api/{username}`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    // ── Request primitive ────────────────────────────────────────────

    /// Send `method {prefix}{path}` with the client's headers.
    ///
    /// `path` is relative to the prefix (`""` addresses the bridge itself,
    /// `"/lights"` its lights). The decoded body is returned whatever the
    /// status, unless the client was configured with strict status checks.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, Error> {
        debug!(%method, mode = %self.mode, resource = path, "bridge request");
        let full = format!("{}{path}", self.prefix);
        self.executor
            .execute(method, &full, self.headers.clone(), body)
            .await
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value, Error> {
        self.request::<()>(Method::GET, path, None)
            .await
            .map(ApiResponse::into_body)
    }

    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, Error> {
        self.request(Method::PUT, path, Some(body))
            .await
            .map(ApiResponse::into_body)
    }

    /// `GET {root}{path}` with the client's headers, outside the bridge
    /// prefix.
    pub async fn get_json(&self, path: &str) -> Result<Value, Error> {
        debug!(path = %self.redact(path), "raw GET");
        self.executor
            .execute::<()>(Method::GET, path, self.headers.clone(), None)
            .await
            .map(ApiResponse::into_body)
    }

    /// `path` with the username/app-key masked, for logging.
    fn redact<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if path.contains(self.username.as_str()) {
            Cow::Owned(path.replace(self.username.as_str(), "***"))
        } else {
            Cow::Borrowed(path)
        }
    }

    // ── Bridge-level endpoints ───────────────────────────────────────

    /// Bridges linked to the OAuth account.
    ///
    /// `GET /v2/bridges` (remote only)
    pub async fn get_bridges(&self) -> Result<Vec<DiscoveredBridge>, Error> {
        if self.mode != ConnectionMode::Remote {
            return Err(Error::UnsupportedOperation(
                "listing bridges requires remote mode",
            ));
        }
        let body = self.get_json("/v2/bridges").await?;
        models::decode(body)
    }

    /// Full bridge state: lights, groups, config, schedules, scenes,
    /// rules, sensors, and resource links in one document.
    ///
    /// `GET {prefix}`
    pub async fn get_bridge_information(&self) -> Result<Value, Error> {
        self.get("").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn remote_client() -> BridgeClient {
        let credentials =
            Credentials::remote(SecretString::from("tok-1".to_owned()), "bridge-1", "abc123");
        let config = ClientConfig::remote().unwrap();
        BridgeClient::with_client(reqwest::Client::new(), &config, &credentials).unwrap()
    }

    #[test]
    fn redact_masks_app_key() {
        let client = remote_client();
        assert_eq!(
            client.redact("/v2/bridges/bridge-1/abc123/config"),
            "/v2/bridges/bridge-1/***/config"
        );
    }

    #[test]
    fn redact_leaves_other_paths_alone() {
        let client = remote_client();
        assert!(matches!(client.redact("/v2/bridges"), Cow::Borrowed("/v2/bridges")));
    }
}
