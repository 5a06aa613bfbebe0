//! Closed enums for entity kinds and product use cases.
//!
//! Wire names (serde, `Display`, `FromStr`) are stable identifiers shared
//! with the console's URL and query layers: SCREAMING_SNAKE for entity
//! types, kebab-case for use cases. Changing them is a breaking change to
//! every bookmarked URL.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed catalog of domain-object kinds the console can
/// navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Cluster,
    Namespace,
    Node,
    Deployment,
    Image,
    Component,
    Cve,
    Policy,
    Control,
    Role,
    Subject,
    ServiceAccount,
    Secret,
}

impl EntityType {
    /// Every variant, in declaration order.
    pub const ALL: [EntityType; 13] = [
        EntityType::Cluster,
        EntityType::Namespace,
        EntityType::Node,
        EntityType::Deployment,
        EntityType::Image,
        EntityType::Component,
        EntityType::Cve,
        EntityType::Policy,
        EntityType::Control,
        EntityType::Role,
        EntityType::Subject,
        EntityType::ServiceAccount,
        EntityType::Secret,
    ];

    /// Stable wire name, identical to the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityType::Cluster => "CLUSTER",
            EntityType::Namespace => "NAMESPACE",
            EntityType::Node => "NODE",
            EntityType::Deployment => "DEPLOYMENT",
            EntityType::Image => "IMAGE",
            EntityType::Component => "COMPONENT",
            EntityType::Cve => "CVE",
            EntityType::Policy => "POLICY",
            EntityType::Control => "CONTROL",
            EntityType::Role => "ROLE",
            EntityType::Subject => "SUBJECT",
            EntityType::ServiceAccount => "SERVICE_ACCOUNT",
            EntityType::Secret => "SECRET",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for [`EntityType::from_str`] on an unknown wire name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntityTypeError {
    pub input: String,
}

impl fmt::Display for ParseEntityTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown entity type: {:?}", self.input)
    }
}

impl std::error::Error for ParseEntityTypeError {}

impl FromStr for EntityType {
    type Err = ParseEntityTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEntityTypeError { input: s.to_string() })
    }
}

/// A top-level product area. Each use case scopes which entity types are
/// relevant, so cross-use-case types never leak into derived option
/// lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UseCase {
    #[serde(rename = "vulnerability-management")]
    VulnerabilityManagement,
    #[serde(rename = "configuration-management")]
    ConfigManagement,
    #[serde(rename = "compliance")]
    Compliance,
}

impl UseCase {
    pub const ALL: [UseCase; 3] = [
        UseCase::VulnerabilityManagement,
        UseCase::ConfigManagement,
        UseCase::Compliance,
    ];

    /// Stable wire name, identical to the serde representation and the
    /// URL path segment.
    pub const fn as_str(self) -> &'static str {
        match self {
            UseCase::VulnerabilityManagement => "vulnerability-management",
            UseCase::ConfigManagement => "configuration-management",
            UseCase::Compliance => "compliance",
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for [`UseCase::from_str`] on an unknown wire name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseUseCaseError {
    pub input: String,
}

impl fmt::Display for ParseUseCaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown use case: {:?}", self.input)
    }
}

impl std::error::Error for ParseUseCaseError {}

impl FromStr for UseCase {
    type Err = ParseUseCaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UseCase::ALL
            .iter()
            .copied()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| ParseUseCaseError { input: s.to_string() })
    }
}
