// Light and group state endpoints
//
// State writes answer with an acknowledgement array, one entry per field:
// `[{"success": {"/lights/1/state/on": true}}, {"error": {...}}]`. It is
// relayed unchanged; see `models::embedded_errors` for picking it apart.

use serde_json::Value;
use tracing::debug;

use crate::auth::path_segment;
use crate::bridge::client::BridgeClient;
use crate::bridge::resources::Resource;
use crate::error::Error;
use crate::models::NewLightState;

impl BridgeClient {
    /// All lights, keyed by bridge-assigned id.
    ///
    /// `GET {prefix}/lights`
    pub async fn get_lights(&self) -> Result<Value, Error> {
        self.get_resource(Resource::Lights).await
    }

    /// A single light.
    ///
    /// `GET {prefix}/lights/{light_id}`
    ///
    /// Ids must be a single path segment; `/`, `?` or `#` are rejected with
    /// [`Error::Config`] before any request is sent.
    pub async fn get_light(&self, light_id: &str) -> Result<Value, Error> {
        let light_id = path_segment("light id", light_id)?;
        self.get(&format!("/lights/{light_id}")).await
    }

    /// Apply a partial state update to a light.
    ///
    /// `PUT {prefix}/lights/{light_id}/state`
    ///
    /// The id is checked as in [`get_light`](Self::get_light).
    pub async fn set_light_state(
        &self,
        light_id: &str,
        state: &NewLightState,
    ) -> Result<Value, Error> {
        let light_id = path_segment("light id", light_id)?;
        debug!(light_id, "setting light state");
        self.put(&format!("/lights/{light_id}/state"), state).await
    }

    /// Apply a partial state update to every light in a group.
    ///
    /// `PUT {prefix}/groups/{group_id}/action`
    pub async fn set_group_action(
        &self,
        group_id: &str,
        state: &NewLightState,
    ) -> Result<Value, Error> {
        let group_id = path_segment("group id", group_id)?;
        debug!(group_id, "setting group action");
        self.put(&format!("/groups/{group_id}/action"), state).await
    }
}
