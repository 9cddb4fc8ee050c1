use url::Url;

use crate::auth::ConnectionMode;
use crate::error::Error;

/// Default root of the Hue cloud API.
pub const DEFAULT_API_ROOT: &str = "https://api.meethue.com";

/// Immutable client configuration: where requests go and how they are
/// addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_root: Url,
    pub mode: ConnectionMode,
    /// Fail with [`Error::HttpStatus`] on non-2xx responses instead of
    /// returning the decoded body. Off by default.
    pub strict_status: bool,
}

impl ClientConfig {
    pub fn new(api_root: &str, mode: ConnectionMode) -> Result<Self, Error> {
        let api_root = Url::parse(api_root)?;
        if api_root.cannot_be_a_base() {
            return Err(Error::config(format!("API root is not a base URL: {api_root}")));
        }
        Ok(Self {
            api_root,
            mode,
            strict_status: false,
        })
    }

    /// Cloud proxy at [`DEFAULT_API_ROOT`].
    pub fn remote() -> Result<Self, Error> {
        Self::new(DEFAULT_API_ROOT, ConnectionMode::Remote)
    }

    /// Bridge on the local network, e.g. `https://192.168.1.20`.
    pub fn local(bridge_root: &str) -> Result<Self, Error> {
        Self::new(bridge_root, ConnectionMode::Local)
    }

    pub fn with_strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn remote_defaults_to_meethue() {
        let config = ClientConfig::remote().unwrap();
        assert_eq!(config.mode, ConnectionMode::Remote);
        assert_eq!(config.api_root.as_str(), "https://api.meethue.com/");
        assert!(!config.strict_status);
    }

    #[test]
    fn rejects_invalid_root() {
        assert!(matches!(
            ClientConfig::local("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(ClientConfig::local("mailto:someone@example.com").unwrap_err().is_config());
    }
}
