// Read endpoints for the remaining bridge collections
//
// Each collection is a JSON object keyed by bridge-assigned numeric-string
// ids. Documents are passed through untouched.

use serde_json::Value;

use crate::auth::path_segment;
use crate::bridge::client::BridgeClient;
use crate::error::Error;

/// Collections exposed under the bridge prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Lights,
    Sensors,
    Groups,
    Schedules,
    Scenes,
    Rules,
    ResourceLinks,
    Capabilities,
}

impl Resource {
    pub const ALL: [Self; 8] = [
        Self::Lights,
        Self::Sensors,
        Self::Groups,
        Self::Schedules,
        Self::Scenes,
        Self::Rules,
        Self::ResourceLinks,
        Self::Capabilities,
    ];

    /// Path segment under the bridge prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::Sensors => "sensors",
            Self::Groups => "groups",
            Self::Schedules => "schedules",
            Self::Scenes => "scenes",
            Self::Rules => "rules",
            Self::ResourceLinks => "resourcelinks",
            Self::Capabilities => "capabilities",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BridgeClient {
    /// `GET {prefix}/{resource}`
    pub async fn get_resource(&self, resource: Resource) -> Result<Value, Error> {
        self.get(&format!("/{resource}")).await
    }

    pub async fn get_sensors(&self) -> Result<Value, Error> {
        self.get_resource(Resource::Sensors).await
    }

    /// `GET {prefix}/sensors/{sensor_id}`
    ///
    /// Rejects an id that is not a single path segment.
    pub async fn get_sensor(&self, sensor_id: &str) -> Result<Value, Error> {
        let sensor_id = path_segment("sensor id", sensor_id)?;
        self.get(&format!("/sensors/{sensor_id}")).await
    }

    pub async fn get_groups(&self) -> Result<Value, Error> {
        self.get_resource(Resource::Groups).await
    }

    /// `GET {prefix}/groups/{group_id}`
    ///
    /// Rejects an id that is not a single path segment.
    pub async fn get_group(&self, group_id: &str) -> Result<Value, Error> {
        let group_id = path_segment("group id", group_id)?;
        self.get(&format!("/groups/{group_id}")).await
    }

    pub async fn get_schedules(&self) -> Result<Value, Error> {
        self.get_resource(Resource::Schedules).await
    }

    pub async fn get_scenes(&self) -> Result<Value, Error> {
        self.get_resource(Resource::Scenes).await
    }

    pub async fn get_rules(&self) -> Result<Value, Error> {
        self.get_resource(Resource::Rules).await
    }

    pub async fn get_resourcelinks(&self) -> Result<Value, Error> {
        self.get_resource(Resource::ResourceLinks).await
    }

    /// Bridge capacity limits (how many more lights, sensors, etc. fit).
    pub async fn get_capabilities(&self) -> Result<Value, Error> {
        self.get_resource(Resource::Capabilities).await
    }
}
