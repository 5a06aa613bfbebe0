//! Path-segment slugs for entity types.
//!
//! A list frame renders as the plural slug (`/deployments`); an instance
//! frame renders as the singular slug followed by its id
//! (`/deployment/<id>`). The singular/plural split is what lets the
//! decoder tell "the next segment is an id" from "the next segment is
//! another entity type" without lookahead heuristics.

use drillnav_catalog::EntityType;

/// Singular slug: names one instance.
pub fn singular(t: EntityType) -> &'static str {
    match t {
        EntityType::Cluster => "cluster",
        EntityType::Namespace => "namespace",
        EntityType::Node => "node",
        EntityType::Deployment => "deployment",
        EntityType::Image => "image",
        EntityType::Component => "component",
        EntityType::Cve => "cve",
        EntityType::Policy => "policy",
        EntityType::Control => "control",
        EntityType::Role => "role",
        EntityType::Subject => "subject",
        EntityType::ServiceAccount => "service-account",
        EntityType::Secret => "secret",
    }
}

/// Plural slug: names the list view.
pub fn plural(t: EntityType) -> &'static str {
    match t {
        EntityType::Cluster => "clusters",
        EntityType::Namespace => "namespaces",
        EntityType::Node => "nodes",
        EntityType::Deployment => "deployments",
        EntityType::Image => "images",
        EntityType::Component => "components",
        EntityType::Cve => "cves",
        EntityType::Policy => "policies",
        EntityType::Control => "controls",
        EntityType::Role => "roles",
        EntityType::Subject => "subjects",
        EntityType::ServiceAccount => "service-accounts",
        EntityType::Secret => "secrets",
    }
}

/// Inverse lookup for a singular slug.
pub fn from_singular(slug: &str) -> Option<EntityType> {
    EntityType::ALL.into_iter().find(|&t| singular(t) == slug)
}

/// Inverse lookup for a plural slug.
pub fn from_plural(slug: &str) -> Option<EntityType> {
    EntityType::ALL.into_iter().find(|&t| plural(t) == slug)
}
