//! The declarative relationship graph between entity types.
//!
//! Four directed relation kinds are declared per type:
//!
//! - **children**: structurally nested one level below (a namespace's
//!   deployments). Drilling into a child keeps the current entity as
//!   context.
//! - **parents**: the inverse direction, declared separately. The graph
//!   is intentionally asymmetric: declaring `A -> B` as a child does
//!   *not* imply `B -> A` as a parent unless that edge is also declared.
//! - **matches** (pure): a cross-cutting association rather than nesting
//!   (a deployment and the policies it violates).
//! - **extended matches**: weaker associations surfaced in the UI but
//!   excluded from the containment closure (a CVE "occurring in" an
//!   image through its components).
//!
//! **contains** is derived, not declared: everything reachable from a
//! type through child edges, picking up each child's pure matches along
//! the way. By construction it never includes the root type, even if a
//! cyclic declaration would otherwise feed it back in.

use crate::entity::{EntityType, UseCase};

// ============================================================================
// Declared edges
// ============================================================================

/// Direct structural children of `t`.
pub fn children(t: EntityType) -> &'static [EntityType] {
    use EntityType::*;
    match t {
        Cluster => &[Node, Namespace, Role],
        Namespace => &[Deployment, Secret, ServiceAccount],
        Deployment => &[Image],
        Image => &[Component],
        Node | Component | Cve | Policy | Control | Role | Subject | ServiceAccount | Secret => {
            &[]
        }
    }
}

/// Declared structural parents of `t`.
pub fn parents(t: EntityType) -> &'static [EntityType] {
    use EntityType::*;
    match t {
        Node | Namespace | Role => &[Cluster],
        Deployment => &[Namespace, Cluster],
        ServiceAccount | Secret => &[Namespace],
        Cluster | Image | Component | Cve | Policy | Control | Subject => &[],
    }
}

/// Pure (first-class) match associations of `t`.
pub fn pure_matches(t: EntityType) -> &'static [EntityType] {
    use EntityType::*;
    match t {
        Cluster | Node => &[Control],
        Deployment => &[ServiceAccount, Policy, Control, Secret],
        Image => &[Deployment],
        Component => &[Image, Cve],
        Cve => &[Component],
        Policy => &[Deployment],
        Control => &[Node],
        Role => &[ServiceAccount, Subject],
        Subject => &[Role],
        ServiceAccount => &[Deployment, Role],
        Secret => &[Deployment],
        Namespace => &[],
    }
}

/// Extended match associations of `t`. Surfaced as related entities but
/// never folded into [`contains`].
pub fn extended_matches(t: EntityType) -> &'static [EntityType] {
    use EntityType::*;
    match t {
        Component => &[Deployment, Node],
        Cve => &[Image, Deployment, Node],
        Control => &[Cluster, Deployment],
        Cluster | Namespace | Node | Deployment | Image | Policy | Role | Subject
        | ServiceAccount | Secret => &[],
    }
}

/// Pure matches followed by extended matches, declaration order
/// preserved.
pub fn matches(t: EntityType) -> Vec<EntityType> {
    let mut out = pure_matches(t).to_vec();
    out.extend_from_slice(extended_matches(t));
    out
}

// ============================================================================
// Derived containment
// ============================================================================

/// Everything transitively contained in `t`: each child, each child's
/// pure matches, and (recursively) everything those children contain.
///
/// Deduplicated, deterministic (declaration-order walk), and guaranteed
/// to exclude `t` itself. Memo-free; callers that are hot may cache.
pub fn contains(t: EntityType) -> Vec<EntityType> {
    let mut visited = Vec::new();
    let mut out = Vec::new();
    collect_contained(t, &mut visited, &mut out);
    out.retain(|&found| found != t);
    out
}

fn collect_contained(
    t: EntityType,
    visited: &mut Vec<EntityType>,
    out: &mut Vec<EntityType>,
) {
    // `visited` guards recursion, `out` carries the answer; a type can be
    // in `out` (as someone's match) without having been descended into.
    if visited.contains(&t) {
        return;
    }
    visited.push(t);

    for &child in children(t) {
        push_unique(out, child);
        for &matched in pure_matches(child) {
            push_unique(out, matched);
        }
        collect_contained(child, visited, out);
    }
}

fn push_unique(out: &mut Vec<EntityType>, t: EntityType) {
    if !out.contains(&t) {
        out.push(t);
    }
}

// ============================================================================
// Membership tests
// ============================================================================

pub fn is_child(parent: EntityType, child: EntityType) -> bool {
    children(parent).contains(&child)
}

pub fn is_parent(child: EntityType, parent: EntityType) -> bool {
    parents(child).contains(&parent)
}

pub fn is_pure_match(a: EntityType, b: EntityType) -> bool {
    pure_matches(a).contains(&b)
}

pub fn is_extended_match(a: EntityType, b: EntityType) -> bool {
    extended_matches(a).contains(&b)
}

pub fn is_match(a: EntityType, b: EntityType) -> bool {
    is_pure_match(a, b) || is_extended_match(a, b)
}

pub fn is_contained(outer: EntityType, inner: EntityType) -> bool {
    contains(outer).contains(&inner)
}

/// True only when containment is *inferred* through a match chain rather
/// than a direct child edge. Callers use this to distinguish "literally
/// nested under" from "co-occurs under, transitively".
pub fn is_contained_inferred(outer: EntityType, inner: EntityType) -> bool {
    outer != inner && is_contained(outer, inner) && !is_child(outer, inner)
}

/// True when `b` participates in any declared or derived relationship
/// with `a` (or is `a` itself). A push whose target fails this test has
/// nowhere to anchor and starts a fresh stack.
pub fn is_relatable(a: EntityType, b: EntityType) -> bool {
    a == b || is_child(a, b) || is_parent(a, b) || is_match(a, b) || is_contained(a, b)
}

// ============================================================================
// Use-case scoping
// ============================================================================

/// Relation kinds addressable through [`entity_types_by_relationship`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    Children,
    Parents,
    Matches,
    Contains,
}

/// Entity types registered for a use case. Types outside this list never
/// appear in that use case's navigation, option lists, or URLs.
pub fn use_case_entity_types(use_case: UseCase) -> &'static [EntityType] {
    use EntityType::*;
    match use_case {
        UseCase::VulnerabilityManagement => {
            &[Cluster, Namespace, Node, Deployment, Image, Component, Cve, Policy]
        }
        UseCase::ConfigManagement => &[
            Cluster,
            Namespace,
            Node,
            Deployment,
            Image,
            Secret,
            ServiceAccount,
            Role,
            Subject,
            Policy,
            Control,
        ],
        UseCase::Compliance => &[Cluster, Namespace, Node, Deployment, Control],
    }
}

/// One of the four relation queries, filtered to the types registered
/// for `use_case`.
pub fn entity_types_by_relationship(
    t: EntityType,
    kind: RelationshipKind,
    use_case: UseCase,
) -> Vec<EntityType> {
    let related = match kind {
        RelationshipKind::Children => children(t).to_vec(),
        RelationshipKind::Parents => parents(t).to_vec(),
        RelationshipKind::Matches => matches(t),
        RelationshipKind::Contains => contains(t),
    };
    let registered = use_case_entity_types(use_case);
    related
        .into_iter()
        .filter(|found| registered.contains(found))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType::*;

    #[test]
    fn containment_walks_child_chains() {
        // Cluster -> Namespace -> Deployment -> Image -> Component, plus
        // the pure matches picked up along the way.
        let contained = contains(Cluster);
        for t in [Namespace, Deployment, Image, Component, Cve, Policy, Secret] {
            assert!(contained.contains(&t), "{t} should be contained in CLUSTER");
        }
        assert!(!contained.contains(&Cluster));
    }

    #[test]
    fn containment_picks_up_pure_matches_of_children() {
        // Policy is nobody's child; it enters the closure as a pure match
        // of Deployment.
        assert!(contains(Namespace).contains(&Policy));
        // Extended matches stay out: Node is an extended match of
        // Component but nothing under Image declares it purely.
        assert!(!contains(Image).contains(&Node));
    }

    #[test]
    fn leaf_types_contain_nothing() {
        for t in [Component, Cve, Policy, Subject, Secret] {
            assert!(contains(t).is_empty(), "{t} should contain nothing");
        }
    }

    #[test]
    fn relationship_graph_is_asymmetric_by_design() {
        // Image is a child of Deployment, but Image declares no parents:
        // image pages exist outside any single deployment.
        assert!(is_child(Deployment, Image));
        assert!(!is_parent(Image, Deployment));
        // Deployment matches Secret purely; Secret matches Deployment
        // back, but that is a separate declaration, not an inference.
        assert!(is_pure_match(Deployment, Secret));
        assert!(is_pure_match(Secret, Deployment));
        // Cve -> Image is extended only.
        assert!(is_extended_match(Cve, Image));
        assert!(!is_pure_match(Cve, Image));
    }

    #[test]
    fn matches_preserves_declaration_order_pure_first() {
        assert_eq!(matches(Cve), vec![Component, Image, Deployment, Node]);
        assert_eq!(matches(Component), vec![Image, Cve, Deployment, Node]);
    }

    #[test]
    fn inferred_containment_excludes_direct_children() {
        // Namespace is a direct child of Cluster, so not "inferred".
        assert!(!is_contained_inferred(Cluster, Namespace));
        // Deployment is only reachable from Cluster through Namespace.
        assert!(is_contained_inferred(Cluster, Deployment));
        assert!(!is_contained_inferred(Cluster, Cluster));
    }

    #[test]
    fn use_case_filter_drops_unregistered_types() {
        // Deployment's pure matches include Secret and ServiceAccount,
        // neither of which is registered for vulnerability management.
        let vm = entity_types_by_relationship(
            Deployment,
            RelationshipKind::Matches,
            UseCase::VulnerabilityManagement,
        );
        assert!(vm.contains(&Policy));
        assert!(!vm.contains(&Secret));
        assert!(!vm.contains(&ServiceAccount));

        let cm = entity_types_by_relationship(
            Deployment,
            RelationshipKind::Matches,
            UseCase::ConfigManagement,
        );
        assert!(cm.contains(&Secret));
        assert!(cm.contains(&ServiceAccount));
    }

    #[test]
    fn compliance_scopes_to_infrastructure_types() {
        let types = use_case_entity_types(UseCase::Compliance);
        assert!(types.contains(&Control));
        assert!(!types.contains(&Cve));
        assert!(!types.contains(&Secret));
    }
}
