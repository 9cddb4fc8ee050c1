//! Async client for the Philips Hue API.
//!
//! One [`BridgeClient`] covers both ways of reaching a bridge:
//!
//! - **Remote** — through the cloud proxy at `api.meethue.com`, with an
//!   OAuth2 bearer token and the bridge id (`/v2/bridges/{id}/{username}`).
//! - **Local** — straight to the bridge on the LAN, authenticated by the
//!   username/app-key in the path (`/api/{username}`).
//!
//! [`OAuthClient`] builds consent links and exchanges codes for tokens;
//! [`nupnp_scan`] asks the public discovery registry for reachable bridges.
//!
//! Responses are relayed as `serde_json::Value`. Non-2xx statuses are not
//! errors unless [`ClientConfig::strict_status`] is set: the bridge reports
//! most failures as `{"error": {...}}` entries inside 200 responses, which
//! [`embedded_errors`] can pull out.

pub mod auth;
pub mod bridge;
pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod models;
pub mod oauth;
pub mod transport;

pub use auth::{ConnectionMode, Credentials, build_headers, resolve_prefix};
pub use bridge::{BridgeClient, Resource};
pub use config::{ClientConfig, DEFAULT_API_ROOT};
pub use discovery::{DISCOVERY_URL, DiscoveryClient, nupnp_scan, nupnp_scan_with};
pub use error::Error;
pub use executor::RequestExecutor;
pub use models::{
    Alert, ApiResponse, BridgeError, DiscoveredBridge, Effect, Light, LightState, NewLightState,
    OAuthToken, Sensor, TokenResponse, embedded_errors, successes,
};
pub use oauth::{OAuthClient, OAuthLinkParams, oauth_link};
pub use transport::{DISCOVERY_TIMEOUT, TlsMode, TransportConfig};

pub use secrecy::{ExposeSecret, SecretString};
