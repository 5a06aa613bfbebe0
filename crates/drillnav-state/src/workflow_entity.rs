//! A single frame of the navigation stack.

use drillnav_catalog::EntityType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque instance identifier, as handed back by the console's API.
///
/// Ids are *not* assumed to be UUIDs (image ids are sha digests,
/// component ids are composite `name:version` keys), so this is a plain
/// string newtype.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry in the navigation stack: an entity type, optionally bound
/// to a specific instance.
///
/// Without an id the frame is a *list* ("browsing deployments"); with an
/// id it is one *instance* ("viewing deployment `abc`"). The short serde
/// field names (`t`/`i`) match the console's historical wire format for
/// serialized stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEntity {
    #[serde(rename = "t")]
    entity_type: EntityType,
    #[serde(rename = "i", skip_serializing_if = "Option::is_none", default)]
    entity_id: Option<EntityId>,
}

impl WorkflowEntity {
    /// A list frame: browsing all entities of `entity_type`.
    pub fn list(entity_type: EntityType) -> Self {
        Self { entity_type, entity_id: None }
    }

    /// An instance frame: one concrete entity.
    pub fn instance(entity_type: EntityType, entity_id: impl Into<EntityId>) -> Self {
        Self { entity_type, entity_id: Some(entity_id.into()) }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn entity_id(&self) -> Option<&EntityId> {
        self.entity_id.as_ref()
    }

    pub fn is_list(&self) -> bool {
        self.entity_id.is_none()
    }

    /// The same frame rebound to a different instance id.
    pub fn with_id(&self, entity_id: impl Into<EntityId>) -> Self {
        Self::instance(self.entity_type, entity_id)
    }
}

impl fmt::Display for WorkflowEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity_id {
            Some(id) => write!(f, "{}:{}", self.entity_type, id),
            None => write!(f, "{}", self.entity_type),
        }
    }
}
