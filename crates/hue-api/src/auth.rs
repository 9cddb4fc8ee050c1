// Connection modes, credentials, and the two pure building blocks every
// bridge request goes through: the path prefix resolver and the
// authentication header builder.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// How the client reaches the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionMode {
    /// Through the Philips cloud proxy (`api.meethue.com`). Needs an OAuth
    /// access token and the bridge id.
    Remote,
    /// Directly against the bridge's own REST API on the local network.
    /// Authenticated by the username/app-key embedded in the path.
    Local,
}

impl ConnectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl std::fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConnectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            other => Err(Error::config(format!(
                "unknown connection mode '{other}', expected 'remote' or 'local'"
            ))),
        }
    }
}

/// Identifying parameters and secrets for one bridge session.
///
/// The username is the bridge-issued app-key, not a login name. Nothing
/// here is persisted by this crate.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: Option<SecretString>,
    pub bridge_id: Option<String>,
    pub username: String,
}

impl Credentials {
    /// Credentials for the cloud proxy.
    pub fn remote(
        access_token: SecretString,
        bridge_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token),
            bridge_id: Some(bridge_id.into()),
            username: username.into(),
        }
    }

    /// Credentials for a bridge on the local network.
    pub fn local(username: impl Into<String>) -> Self {
        Self {
            access_token: None,
            bridge_id: None,
            username: username.into(),
        }
    }
}

/// Build the path prefix for bridge-scoped resources.
///
/// - Remote: `/v2/bridges/{bridge_id}/{username}`
/// - Local: `/api/{username}`
///
/// The username is required in both modes and, like the bridge id, must be
/// a single path segment.
pub fn resolve_prefix(
    mode: ConnectionMode,
    bridge_id: Option<&str>,
    username: &str,
) -> Result<String, Error> {
    let username = path_segment("username", username)?;
    match mode {
        ConnectionMode::Remote => {
            let bridge_id = bridge_id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| Error::config("remote mode requires a bridge id"))?;
            let bridge_id = path_segment("bridge id", bridge_id)?;
            Ok(format!("/v2/bridges/{bridge_id}/{username}"))
        }
        ConnectionMode::Local => Ok(format!("/api/{username}")),
    }
}

/// Check that `value` can stand alone as one URL path segment.
///
/// Values are interpolated into paths verbatim, so a `/`, `?` or `#` would
/// silently address a different resource.
pub(crate) fn path_segment<'a>(what: &str, value: &'a str) -> Result<&'a str, Error> {
    if value.is_empty() {
        return Err(Error::config(format!("a {what} is required")));
    }
    if value.contains(['/', '?', '#']) {
        return Err(Error::config(format!(
            "{what} {value:?} must not contain '/', '?' or '#'"
        )));
    }
    Ok(value)
}

/// Build the default header set for a connection mode.
///
/// Remote requests carry `Authorization: Bearer {token}`; local requests
/// never carry an `Authorization` header.
pub fn build_headers(
    mode: ConnectionMode,
    access_token: Option<&SecretString>,
) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if mode == ConnectionMode::Remote {
        let token = access_token
            .filter(|t| !t.expose_secret().is_empty())
            .ok_or_else(|| Error::config("remote mode requires an access token"))?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::config(format!("invalid access token header value: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
