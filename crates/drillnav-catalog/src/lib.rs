//! Entity catalog and relationship graph for drill-down navigation.
//!
//! A security console navigates a fixed, closed set of entity kinds
//! (clusters, deployments, images, CVEs, ...). This crate answers
//! *structural* questions about those kinds — "is a deployment nested
//! under a namespace?", "which types can an image page link out to?" —
//! without knowledge of any concrete instance.
//!
//! Everything here is plain data plus pure, total functions:
//!
//! - [`EntityType`] / [`UseCase`] are closed enums, so a type missing
//!   from the catalog is unrepresentable rather than a runtime error.
//! - Relationship tables are `&'static` slices keyed by exhaustive
//!   `match`; adding a variant without declaring its edges fails to
//!   compile.
//! - [`contains`] is a derived transitive closure (children plus,
//!   recursively, their pure matches) and never includes the root type.

pub mod entity;
pub mod relationships;

pub use entity::{EntityType, ParseEntityTypeError, ParseUseCaseError, UseCase};
pub use relationships::{
    children, contains, entity_types_by_relationship, extended_matches, is_child,
    is_contained, is_contained_inferred, is_extended_match, is_match, is_parent,
    is_pure_match, is_relatable, matches, parents, pure_matches, use_case_entity_types,
    RelationshipKind,
};
