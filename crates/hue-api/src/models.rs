// Hue API payload types
//
// Bridge documents are relayed as raw `serde_json::Value`. The typed views
// here are optional conveniences: every field is optional because bridge
// firmware versions disagree about which ones are present, and unknown
// fields land in `extra`.

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

// ── Response ─────────────────────────────────────────────────────────

/// Decoded response body plus the HTTP status it arrived with.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// Decode the body into a typed view.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Error> {
        decode(self.body)
    }
}

/// Decode a relayed JSON document into a typed view.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    let raw = value.to_string();
    serde_json::from_value(value).map_err(|e| Error::Decode {
        message: e.to_string(),
        body: raw,
    })
}

// ── Light state updates ──────────────────────────────────────────────

/// Alert effect. `Select` flashes once, `Lselect` flashes for 15 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alert {
    None,
    Select,
    Lselect,
}

/// Dynamic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    None,
    Colorloop,
}

/// Partial light state update for `PUT .../lights/{id}/state`.
///
/// Only fields that are set are sent. Nothing is validated locally; the
/// bridge answers with one success or error entry per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewLightState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    /// Brightness, 1..=254.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat: Option<u8>,
    /// CIE color space coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xy: Option<[f32; 2]>,
    /// Color temperature in mireds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
    /// Transition duration in multiples of 100ms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitiontime: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri_inc: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat_inc: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue_inc: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct_inc: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xy_inc: Option<[f32; 2]>,
}

impl NewLightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, on: bool) -> Self {
        self.on = Some(on);
        self
    }

    pub fn brightness(mut self, bri: u8) -> Self {
        self.bri = Some(bri);
        self
    }

    pub fn hue_sat(mut self, hue: u16, sat: u8) -> Self {
        self.hue = Some(hue);
        self.sat = Some(sat);
        self
    }

    pub fn color_xy(mut self, x: f32, y: f32) -> Self {
        self.xy = Some([x, y]);
        self
    }

    pub fn color_temperature(mut self, mireds: u16) -> Self {
        self.ct = Some(mireds);
        self
    }

    pub fn alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn transition_time(mut self, deciseconds: u16) -> Self {
        self.transitiontime = Some(deciseconds);
        self
    }

    pub fn brightness_increment(mut self, delta: i16) -> Self {
        self.bri_inc = Some(delta);
        self
    }
}

// ── Bridge acknowledgements ──────────────────────────────────────────

/// An `{ "error": { ... } }` entry from a bridge response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BridgeError {
    #[serde(rename = "type")]
    pub error_type: u16,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

/// Collect embedded `error` entries from a bridge response.
///
/// The bridge reports partial failures inside 200 responses, e.g.
/// `[{"success": {...}}, {"error": {"type": 7, ...}}]`. Non-array bodies
/// yield nothing.
pub fn embedded_errors(body: &Value) -> Vec<BridgeError> {
    entries(body, "error")
        .filter_map(|v| BridgeError::deserialize(v).ok())
        .collect()
}

/// Collect the `success` objects from a bridge acknowledgement array.
pub fn successes(body: &Value) -> Vec<&Map<String, Value>> {
    entries(body, "success").filter_map(Value::as_object).collect()
}

fn entries<'a>(body: &'a Value, key: &'a str) -> impl Iterator<Item = &'a Value> {
    body.as_array()
        .into_iter()
        .flatten()
        .filter_map(move |item| item.get(key))
}

// ── OAuth ────────────────────────────────────────────────────────────

/// Token pair issued by the Hue OAuth2 endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthToken {
    #[serde(deserialize_with = "secret")]
    pub access_token: SecretString,
    #[serde(default, deserialize_with = "seconds")]
    pub access_token_expires_in: Option<u64>,
    #[serde(default, deserialize_with = "optional_secret")]
    pub refresh_token: Option<SecretString>,
    #[serde(default, deserialize_with = "seconds")]
    pub refresh_token_expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Outcome of a token exchange or refresh.
///
/// A rejected or expired code is not an error at this layer: the server's
/// error document is handed back as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TokenResponse {
    Token(OAuthToken),
    Rejected(Value),
}

impl TokenResponse {
    pub fn token(&self) -> Option<&OAuthToken> {
        match self {
            Self::Token(token) => Some(token),
            Self::Rejected(_) => None,
        }
    }

    pub fn into_token(self) -> Option<OAuthToken> {
        match self {
            Self::Token(token) => Some(token),
            Self::Rejected(_) => None,
        }
    }
}

fn secret<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
    String::deserialize(d).map(SecretString::from)
}

fn optional_secret<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.map(SecretString::from))
}

// The token endpoint has sent expiries both as numbers and as strings.
// An expiry that is neither reads as unknown so a usable token is never
// demoted to `TokenResponse::Rejected`.
fn seconds<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(d)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

// ── Discovery ────────────────────────────────────────────────────────

/// A bridge as reported by NUPnP discovery or `GET /v2/bridges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredBridge {
    pub id: String,
    pub internalipaddress: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macaddress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// ── Typed resource views ─────────────────────────────────────────────

/// Light document from `GET .../lights`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Light {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub light_type: Option<String>,
    pub modelid: Option<String>,
    pub manufacturername: Option<String>,
    pub productname: Option<String>,
    pub uniqueid: Option<String>,
    pub swversion: Option<String>,
    pub state: Option<LightState>,
    /// `capabilities`, `config`, `swupdate`, and anything newer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Current state of a light.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightState {
    pub on: Option<bool>,
    pub bri: Option<u8>,
    pub hue: Option<u16>,
    pub sat: Option<u8>,
    pub xy: Option<[f32; 2]>,
    pub ct: Option<u16>,
    pub alert: Option<String>,
    pub effect: Option<String>,
    pub colormode: Option<String>,
    pub mode: Option<String>,
    pub reachable: Option<bool>,
}

/// Sensor document from `GET .../sensors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sensor {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
    pub modelid: Option<String>,
    pub manufacturername: Option<String>,
    pub uniqueid: Option<String>,
    pub swversion: Option<String>,
    pub state: Option<Value>,
    pub config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    #[test]
    fn new_light_state_omits_unset_fields() {
        let state = NewLightState::new().on(true).brightness(200);
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({ "on": true, "bri": 200 })
        );
        assert_eq!(serde_json::to_value(NewLightState::new()).unwrap(), json!({}));
    }

    #[test]
    fn alert_and_effect_use_bridge_names() {
        let state = NewLightState::new()
            .alert(Alert::Lselect)
            .effect(Effect::Colorloop)
            .transition_time(4);
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({ "alert": "lselect", "effect": "colorloop", "transitiontime": 4 })
        );
    }

    #[test]
    fn embedded_errors_from_mixed_acknowledgement() {
        let body = json!([
            { "success": { "/lights/1/state/on": true } },
            { "error": {
                "type": 201,
                "address": "/lights/1/state/bri",
                "description": "parameter, bri, is not modifiable. Device is set to off."
            } }
        ]);

        let errors = embedded_errors(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, 201);
        assert_eq!(errors[0].address, "/lights/1/state/bri");

        let ok = successes(&body);
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0]["/lights/1/state/on"], json!(true));
    }

    #[test]
    fn embedded_errors_ignores_non_arrays() {
        assert!(embedded_errors(&json!({ "1": { "name": "Lamp" } })).is_empty());
        assert!(successes(&Value::Null).is_empty());
    }

    #[test]
    fn token_accepts_string_expiries() {
        let resp: TokenResponse = serde_json::from_value(json!({
            "access_token": "at-1",
            "access_token_expires_in": "604799",
            "refresh_token": "rt-1",
            "refresh_token_expires_in": 9_676_799,
            "token_type": "BearerToken"
        }))
        .unwrap();

        let token = resp.into_token().unwrap();
        assert_eq!(token.access_token.expose_secret(), "at-1");
        assert_eq!(token.access_token_expires_in, Some(604_799));
        assert_eq!(token.refresh_token_expires_in, Some(9_676_799));
        assert_eq!(token.token_type.as_deref(), Some("BearerToken"));
    }

    #[test]
    fn token_debug_redacts_secrets() {
        let resp: TokenResponse =
            serde_json::from_value(json!({ "access_token": "super-secret" })).unwrap();
        let rendered = format!("{resp:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn error_body_is_rejected_not_token() {
        let body = json!({ "fault": { "faultstring": "Invalid Authorization Code" } });
        let resp: TokenResponse = serde_json::from_value(body.clone()).unwrap();
        assert!(resp.token().is_none());
        assert!(matches!(resp, TokenResponse::Rejected(v) if v == body));
    }

    #[test]
    fn unreadable_expiry_keeps_the_token() {
        let resp: TokenResponse = serde_json::from_value(json!({
            "access_token": "tok-1",
            "access_token_expires_in": "",
            "refresh_token": "rt-1",
            "refresh_token_expires_in": { "days": 112 }
        }))
        .unwrap();
        let token = resp.into_token().unwrap();
        assert_eq!(token.access_token.expose_secret(), "tok-1");
        assert_eq!(token.access_token_expires_in, None);
        assert_eq!(token.refresh_token_expires_in, None);
    }

    #[test]
    fn light_view_keeps_unknown_fields() {
        let lights: HashMap<String, Light> = decode(json!({
            "1": {
                "name": "Lamp",
                "type": "Extended color light",
                "state": { "on": true, "bri": 144, "xy": [0.4573, 0.41], "reachable": true },
                "capabilities": { "certified": true }
            }
        }))
        .unwrap();

        let lamp = &lights["1"];
        assert_eq!(lamp.name.as_deref(), Some("Lamp"));
        assert_eq!(lamp.light_type.as_deref(), Some("Extended color light"));
        let state = lamp.state.as_ref().unwrap();
        assert_eq!(state.bri, Some(144));
        assert_eq!(state.colormode, None);
        assert!(lamp.extra.contains_key("capabilities"));
    }

    #[test]
    fn decode_failure_keeps_raw_body() {
        let err = decode::<Vec<DiscoveredBridge>>(json!({ "error": "nope" })).unwrap_err();
        assert!(matches!(err, Error::Decode { ref body, .. } if body.contains("nope")));
    }
}
