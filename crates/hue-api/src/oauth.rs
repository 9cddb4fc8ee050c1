// OAuth2 helpers for the Hue cloud API
//
// Authorization-link construction (pure) and the two token endpoints.
// Neither needs a bridge client or prior authentication. The `state`
// parameter is opaque here: generating and checking it is the caller's job.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::config::DEFAULT_API_ROOT;
use crate::error::Error;
use crate::executor::RequestExecutor;
use crate::models::{self, TokenResponse};
use crate::transport::TransportConfig;

/// Parameters identifying the application and device asking for consent.
#[derive(Debug, Clone, Copy)]
pub struct OAuthLinkParams<'a> {
    pub client_id: &'a str,
    pub app_id: &'a str,
    pub device_id: &'a str,
    pub device_name: &'a str,
    pub state: &'a str,
}

/// Build the consent-screen URL. Performs no I/O.
///
/// `{root}/oauth2/auth?clientid=&appid=&deviceid=&devicename=&state=&response_type=code`
/// with every value percent-encoded, so parsing the query gives back the
/// inputs exactly.
pub fn oauth_link(api_root: &Url, params: &OAuthLinkParams<'_>) -> Result<Url, Error> {
    let root = api_root.as_str().trim_end_matches('/');
    let mut url = Url::parse(&format!("{root}/oauth2/auth"))?;
    url.query_pairs_mut()
        .append_pair("clientid", params.client_id)
        .append_pair("appid", params.app_id)
        .append_pair("deviceid", params.device_id)
        .append_pair("devicename", params.device_name)
        .append_pair("state", params.state)
        .append_pair("response_type", "code");
    Ok(url)
}

/// Client for the OAuth2 token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    executor: RequestExecutor,
}

impl OAuthClient {
    /// Client against [`DEFAULT_API_ROOT`].
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_root(DEFAULT_API_ROOT, transport)
    }

    pub fn with_root(api_root: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, api_root)
    }

    pub fn with_client(http: reqwest::Client, api_root: &str) -> Result<Self, Error> {
        let api_root = Url::parse(api_root)?;
        Ok(Self {
            executor: RequestExecutor::new(http, api_root, false),
        })
    }

    /// Consent-screen URL under this client's API root.
    pub fn oauth_link(&self, params: &OAuthLinkParams<'_>) -> Result<Url, Error> {
        oauth_link(self.executor.api_root(), params)
    }

    /// Exchange an authorization code for tokens.
    ///
    /// `POST /oauth2/token?code={code}&grant_type=authorization_code` with
    /// HTTP Basic credentials `client_id:client_secret`. An invalid or
    /// expired code comes back as [`TokenResponse::Rejected`].
    pub async fn get_token(
        &self,
        client_id: &str,
        client_secret: &SecretString,
        code: &str,
    ) -> Result<TokenResponse, Error> {
        let mut url = self.executor.url("/oauth2/token")?;
        url.query_pairs_mut()
            .append_pair("code", code)
            .append_pair("grant_type", "authorization_code");
        debug!(client_id, "exchanging authorization code");

        let request = self
            .executor
            .http()
            .request(Method::POST, url)
            .basic_auth(client_id, Some(client_secret.expose_secret()));
        let resp = self.executor.send(request).await?;
        models::decode(resp.body)
    }

    /// Trade a refresh token for a new token pair.
    ///
    /// `POST /oauth2/refresh?grant_type=refresh_token` with form body
    /// `refresh_token=...` and the same Basic credentials as
    /// [`get_token`](Self::get_token).
    pub async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &SecretString,
        refresh_token: &SecretString,
    ) -> Result<TokenResponse, Error> {
        let mut url = self.executor.url("/oauth2/refresh")?;
        url.query_pairs_mut().append_pair("grant_type", "refresh_token");
        debug!(client_id, "refreshing access token");

        let request = self
            .executor
            .http()
            .request(Method::POST, url)
            .basic_auth(client_id, Some(client_secret.expose_secret()))
            .form(&[("refresh_token", refresh_token.expose_secret())]);
        let resp = self.executor.send(request).await?;
        models::decode(resp.body)
    }
}
