// Single-request executor
//
// Joins a path onto the API root, sends one request, and decodes the body
// as JSON regardless of status. The status is kept alongside the body so
// callers can branch on it; strict mode turns non-2xx into an error.

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use tracing::trace;
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;

/// Issues single HTTP requests against a fixed API root.
///
/// Cheap to clone; the inner `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    api_root: Url,
    strict_status: bool,
}

impl RequestExecutor {
    pub fn new(http: reqwest::Client, api_root: Url, strict_status: bool) -> Self {
        Self {
            http,
            api_root,
            strict_status,
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Join `path` onto the API root by plain concatenation.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let root = self.api_root.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{root}{path}"))?)
    }

    /// Send `method {root}{path}` with the given extra headers and optional
    /// JSON body, returning the decoded body and status.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<&B>,
    ) -> Result<ApiResponse, Error> {
        let url = self.url(path)?;
        let mut request = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    /// Send a prepared request and decode its body.
    pub(crate) async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, Error> {
        let resp = request.send().await?;
        let status = resp.status();
        trace!(status = status.as_u16(), "response received");

        let text = resp.text().await?;
        let decoded = serde_json::from_str::<serde_json::Value>(&text);

        if self.strict_status && !status.is_success() {
            let body = decoded.unwrap_or_else(|_| serde_json::Value::String(text));
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = decoded.map_err(|e| Error::Decode {
            message: e.to_string(),
            body: text,
        })?;

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn executor(root: &str) -> RequestExecutor {
        RequestExecutor::new(reqwest::Client::new(), Url::parse(root).unwrap(), false)
    }

    #[test]
    fn url_concatenates_root_and_path() {
        let exec = executor("http://192.168.1.20");
        assert_eq!(
            exec.url("/api/abc/lights").unwrap().as_str(),
            "http://192.168.1.20/api/abc/lights"
        );
    }

    #[test]
    fn url_keeps_root_path() {
        let exec = executor("http://proxy.local/hue/");
        assert_eq!(
            exec.url("/api/abc").unwrap().as_str(),
            "http://proxy.local/hue/api/abc"
        );
    }
}
