//! Integration tests for the complete drill-down navigation pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Catalog relationships → stack combination → URL encoding
//! - URL decoding → further navigation → URL encoding
//! - Exhaustive bounded walks over every use case
//!
//! Run with: cargo test --test integration_tests

use drillnav_catalog::{
    entity_types_by_relationship, use_case_entity_types, EntityType, RelationshipKind, UseCase,
};
use drillnav_state::{SearchFilter, WorkflowEntity, WorkflowState};
use drillnav_url::{parse_workflow_url, to_url, try_parse_workflow_url};

// ============================================================================
// Catalog → state → URL
// ============================================================================

#[test]
fn drill_down_from_dashboard_to_cve_and_back_out() {
    // Vulnerability Management dashboard: View All clusters, pick one,
    // open its components, pick one, open its CVEs.
    let state = WorkflowState::new(UseCase::VulnerabilityManagement)
        .push_list(EntityType::Cluster)
        .push_list_item("prod-cluster")
        .push_list(EntityType::Component)
        .push_list_item("openssl")
        .push_list(EntityType::Cve);

    assert_eq!(
        to_url(&state),
        "/vulnerability-management/clusters/cluster/prod-cluster/components/component/openssl/cves"
    );

    // Jumping to a deployment list from here overflows: component -> cve
    // was already the one sideways step this stack could absorb.
    let jumped = state.push_list_item("CVE-2021-3712").push_list(EntityType::Deployment);
    assert_eq!(
        to_url(&jumped),
        "/vulnerability-management/cve/CVE-2021-3712/deployments"
    );
}

#[test]
fn url_of_a_shared_link_reproduces_the_side_panel_filter() {
    let mut panel_filter = SearchFilter::new();
    panel_filter.insert("CVSS", "7.5");

    let state = WorkflowState::new(UseCase::VulnerabilityManagement)
        .push_list(EntityType::Image)
        .push_list_item("sha256:abc")
        .push_list(EntityType::Cve)
        .set_search(panel_filter.clone());

    // the side panel is open, so the filter landed in the panel slot
    assert_eq!(state.search().side_panel, Some(panel_filter.clone()));

    let link = to_url(&state.skimmed());
    let followed = try_parse_workflow_url(&link).expect("shared link decodes");
    assert_eq!(followed.search().page, Some(panel_filter));
    assert_eq!(
        followed.state_stack(),
        &[
            WorkflowEntity::instance(EntityType::Image, "sha256:abc"),
            WorkflowEntity::list(EntityType::Cve),
        ]
    );
}

#[test]
fn decoded_urls_navigate_exactly_like_live_states() {
    let live = WorkflowState::new(UseCase::ConfigManagement)
        .push_list(EntityType::Deployment)
        .push_list_item("dep-1");
    let revived = try_parse_workflow_url(&to_url(&live)).expect("decode");

    for target in use_case_entity_types(UseCase::ConfigManagement) {
        assert_eq!(
            live.push_list(*target).state_stack(),
            revived.push_list(*target).state_stack(),
            "navigation diverged after a URL round trip for {target}"
        );
    }
}

#[test]
fn malformed_bookmarks_land_on_the_dashboard_and_stay_usable() {
    let state = parse_workflow_url("/vulnerability-management/clusters/%zz/oops");
    assert!(state.state_stack().is_empty());

    // the degraded state is a normal state: navigation works from it
    let state = state.push_list(EntityType::Namespace);
    assert_eq!(to_url(&state), "/vulnerability-management/namespaces");
}

// ============================================================================
// Exhaustive bounded walk (per use case)
// ============================================================================

/// Depth-first walk over every related-entity list link the catalog
/// offers, alternating row selection and list pushes the way a user
/// drills through side panels. A navigation path ends when the stack
/// overflows (its length stops growing). The walk terminating at all —
/// and every stack staying under the hard frame bound — is the point of
/// the test.
fn walk_every_list_link(
    state: &WorkflowState,
    registered: &[EntityType],
    visited_stacks: &mut Vec<String>,
) {
    let depth_before = state.state_stack().len();
    let id = depth_before.to_string();
    let selected = state.push_list_item(id);

    let leaf = selected.current_entity_type().expect("walk never starts empty");
    let use_case = selected.use_case();
    let mut reachable = Vec::new();
    for kind in [
        RelationshipKind::Contains,
        RelationshipKind::Matches,
        RelationshipKind::Parents,
    ] {
        for t in entity_types_by_relationship(leaf, kind, use_case) {
            if !reachable.contains(&t) {
                reachable.push(t);
            }
        }
    }

    for target in reachable {
        let already_on_stack = state
            .state_stack()
            .iter()
            .any(|frame| frame.entity_type() == target);
        if already_on_stack || !registered.contains(&target) {
            continue;
        }

        let pushed = selected.push_list(target);
        assert!(
            pushed.state_stack().len() <= 27,
            "stack exceeded its bound: {:?}",
            pushed.state_stack()
        );
        visited_stacks.push(
            pushed
                .state_stack()
                .iter()
                .map(WorkflowEntity::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        );

        if pushed.state_stack().len() == depth_before + 2 {
            walk_every_list_link(&pushed, registered, visited_stacks);
        }
    }
}

#[test]
fn every_use_case_walk_terminates_within_bounds() {
    for use_case in UseCase::ALL {
        let registered = use_case_entity_types(use_case);
        let mut visited_stacks = Vec::new();

        for &root in registered {
            let base = WorkflowState::new(use_case).push_list(root);
            walk_every_list_link(&base, registered, &mut visited_stacks);
        }

        assert!(
            !visited_stacks.is_empty(),
            "{use_case} offers no drill-down paths at all"
        );
        for stack in &visited_stacks {
            assert!(!stack.is_empty());
        }
    }
}
