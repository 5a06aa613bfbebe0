//! The immutable navigation state and its stack-combination algorithm.
//!
//! A [`WorkflowState`] records where the user currently is in a
//! drill-down workflow: an ordered root-to-leaf stack of
//! [`WorkflowEntity`] frames plus page/side-panel parameter slots. Every
//! operation is a pure function returning a fresh state; nothing is
//! mutated in place, so states are safe to share and compare.
//!
//! The interesting policy lives in `push`: when a navigation request
//! arrives, the relationship between the current leaf and the target
//! decides whether the stack *extends* (drilling down), *overflows*
//! (collapses back to the nearest frame that can anchor the target), or
//! *resets* (jumps to an unrelated top-level view).

use drillnav_catalog::{is_child, is_contained, is_relatable, EntityType, UseCase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::params::{PageCursor, ParamSlot, ParamSlots, SearchFilter, SortSpec};
use crate::workflow_entity::{EntityId, WorkflowEntity};

/// Snapshot of the user's position in a drill-down workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    use_case: UseCase,
    state_stack: Vec<WorkflowEntity>,
    #[serde(default, skip_serializing_if = "ParamSlots::is_empty")]
    search: ParamSlots<SearchFilter>,
    #[serde(default, skip_serializing_if = "ParamSlots::is_empty")]
    sort: ParamSlots<SortSpec>,
    #[serde(default, skip_serializing_if = "ParamSlots::is_empty")]
    paging: ParamSlots<PageCursor>,
}

impl WorkflowState {
    /// The empty (dashboard) state for a use case.
    pub fn new(use_case: UseCase) -> Self {
        Self::with_stack(use_case, Vec::new())
    }

    /// A state with an explicit stack and no auxiliary parameters.
    pub fn with_stack(use_case: UseCase, state_stack: Vec<WorkflowEntity>) -> Self {
        Self {
            use_case,
            state_stack,
            search: ParamSlots::empty(),
            sort: ParamSlots::empty(),
            paging: ParamSlots::empty(),
        }
    }

    /// Reassemble a state from all of its parts (URL decoding, tests).
    pub fn from_parts(
        use_case: UseCase,
        state_stack: Vec<WorkflowEntity>,
        search: ParamSlots<SearchFilter>,
        sort: ParamSlots<SortSpec>,
        paging: ParamSlots<PageCursor>,
    ) -> Self {
        Self { use_case, state_stack, search, sort, paging }
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn use_case(&self) -> UseCase {
        self.use_case
    }

    pub fn state_stack(&self) -> &[WorkflowEntity] {
        &self.state_stack
    }

    pub fn search(&self) -> &ParamSlots<SearchFilter> {
        &self.search
    }

    pub fn sort(&self) -> &ParamSlots<SortSpec> {
        &self.sort
    }

    pub fn paging(&self) -> &ParamSlots<PageCursor> {
        &self.paging
    }

    /// The frames the base page owns: one frame when the stack is rooted
    /// in a list, two when it is rooted in an instance (an entity page
    /// renders its active related-entity tab as part of the page).
    /// Everything beyond these frames belongs to the side panel.
    pub fn page_stack(&self) -> &[WorkflowEntity] {
        match self.state_stack.first() {
            None => &[],
            Some(_) if self.state_stack.len() < 2 => &self.state_stack,
            Some(root) if root.is_list() => &self.state_stack[..1],
            Some(_) => &self.state_stack[..2],
        }
    }

    pub fn is_side_panel_open(&self) -> bool {
        self.state_stack.len() > self.page_stack().len()
    }

    /// Type of the leaf frame, or `None` on the dashboard.
    pub fn current_entity_type(&self) -> Option<EntityType> {
        self.state_stack.last().map(WorkflowEntity::entity_type)
    }

    pub fn current_entity(&self) -> Option<&WorkflowEntity> {
        self.state_stack.last()
    }

    /// The stack's root frame (breadcrumb origin).
    pub fn base_entity(&self) -> Option<&WorkflowEntity> {
        self.state_stack.first()
    }

    /// Instance ids of every resolved ancestor, keyed by type. Data
    /// fetching uses this to scope queries ("deployments in *this*
    /// cluster"). List frames with no bound instance contribute nothing;
    /// on a duplicated type the deepest binding wins.
    pub fn entity_context(&self) -> BTreeMap<EntityType, EntityId> {
        self.state_stack
            .iter()
            .filter_map(|frame| {
                frame.entity_id().map(|id| (frame.entity_type(), id.clone()))
            })
            .collect()
    }

    /// True iff the state is exactly the top-level list of `entity_type`
    /// with no instance selected.
    pub fn is_base_list(&self, entity_type: EntityType) -> bool {
        match self.state_stack.as_slice() {
            [only] => only.is_list() && only.entity_type() == entity_type,
            _ => false,
        }
    }

    /// True iff the frame directly beneath the leaf has type
    /// `entity_type` ("I am one level below X").
    pub fn is_preceding(&self, entity_type: EntityType) -> bool {
        let len = self.state_stack.len();
        len >= 2 && self.state_stack[len - 2].entity_type() == entity_type
    }

    /// The first id-bearing frame of `entity_type`, scanning from the
    /// root.
    pub fn single_ancestor_of_type(&self, entity_type: EntityType) -> Option<&WorkflowEntity> {
        self.state_stack
            .iter()
            .find(|frame| frame.entity_type() == entity_type && frame.entity_id().is_some())
    }

    // ------------------------------------------------------------------
    // Navigation operations
    // ------------------------------------------------------------------

    /// Follow a "view all X" link: push a list frame of `entity_type`.
    pub fn push_list(&self, entity_type: EntityType) -> Self {
        self.push(WorkflowEntity::list(entity_type))
    }

    /// Follow a "go to related X #id" link: push an instance frame.
    pub fn push_related_entity(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<EntityId>,
    ) -> Self {
        self.push(WorkflowEntity::instance(entity_type, entity_id))
    }

    /// Select a row in the leaf list: bind (or rebind) the leaf frame's
    /// instance id. Stays at the leaf type; never consults the
    /// relationship graph. No-op on the dashboard.
    pub fn push_list_item(&self, entity_id: impl Into<EntityId>) -> Self {
        let Some(leaf) = self.state_stack.last() else {
            return self.clone();
        };
        let mut stack = self.state_stack.clone();
        if leaf.is_list() {
            stack.push(leaf.with_id(entity_id));
        } else {
            let last = stack.len() - 1;
            stack[last] = leaf.with_id(entity_id);
        }
        Self { state_stack: stack, ..self.clone() }
    }

    /// Remove the leaf frame. No-op at stack length ≤ 1: the base view
    /// has nowhere further to pop to.
    pub fn pop(&self) -> Self {
        if self.state_stack.len() <= 1 {
            return self.clone();
        }
        let mut stack = self.state_stack.clone();
        stack.pop();
        Self { state_stack: stack, ..self.clone() }
    }

    /// Empty the stack (use-case dashboard), dropping all auxiliary
    /// parameters.
    pub fn clear(&self) -> Self {
        Self::new(self.use_case)
    }

    /// Jump to a fresh single-frame state, possibly in another use case.
    pub fn reset(
        &self,
        use_case: UseCase,
        entity_type: EntityType,
        entity_id: Option<EntityId>,
    ) -> Self {
        let frame = match entity_id {
            Some(id) => WorkflowEntity::instance(entity_type, id),
            None => WorkflowEntity::list(entity_type),
        };
        Self::with_stack(use_case, vec![frame])
    }

    /// Close the side panel: truncate the stack to the page frames, keep
    /// the page parameter slots, drop the side-panel slots.
    pub fn remove_side_panel_params(&self) -> Self {
        let page_frames = self.page_stack().to_vec();
        Self {
            use_case: self.use_case,
            state_stack: page_frames,
            search: self.search.clone().page_only(),
            sort: self.sort.clone().page_only(),
            paging: self.paging.clone().page_only(),
        }
    }

    /// Collapse the stack to a shareable deep link: the shortest stack
    /// that still anchors the current leaf, with the side panel's
    /// search/sort/paging folded down into the page slots (so the link,
    /// followed fresh, reproduces the visible filter).
    pub fn skimmed(&self) -> Self {
        if self.state_stack.is_empty() {
            return self.clone();
        }
        Self {
            use_case: self.use_case,
            state_stack: skim_stack(&self.state_stack),
            search: self.search.clone().folded_down(),
            sort: self.sort.clone().folded_down(),
            paging: self.paging.clone().folded_down(),
        }
    }

    /// Record a search filter against the active view (side panel when
    /// open, base page otherwise). Last write wins.
    pub fn set_search(&self, filter: SearchFilter) -> Self {
        Self { search: self.search.clone().with(self.active_slot(), filter), ..self.clone() }
    }

    /// Record sort criteria against the active view.
    pub fn set_sort(&self, sort: SortSpec) -> Self {
        Self { sort: self.sort.clone().with(self.active_slot(), sort), ..self.clone() }
    }

    /// Record a paging cursor against the active view.
    pub fn set_page(&self, page: PageCursor) -> Self {
        Self { paging: self.paging.clone().with(self.active_slot(), page), ..self.clone() }
    }

    fn active_slot(&self) -> ParamSlot {
        if self.is_side_panel_open() {
            ParamSlot::SidePanel
        } else {
            ParamSlot::Page
        }
    }

    // ------------------------------------------------------------------
    // Stack combination
    // ------------------------------------------------------------------

    /// Combine a requested frame with the current stack.
    ///
    /// Extend when the result is a coherent drill-down; overflow (skim)
    /// when it is not; reset when the target has no relationship at all
    /// to the current leaf. Overflow and reset drop the auxiliary
    /// parameter slots: the collapsed stack is a new page context and
    /// must not resurrect filters from the one it replaced.
    fn push(&self, frame: WorkflowEntity) -> Self {
        if self.state_stack.is_empty() {
            return Self::with_stack(self.use_case, vec![frame]);
        }

        let leaf_type = self.state_stack[self.state_stack.len() - 1].entity_type();
        let target = frame.entity_type();
        if !is_relatable(leaf_type, target) {
            debug!(%leaf_type, %target, "push target unrelated to leaf, resetting stack");
            return Self::with_stack(self.use_case, vec![frame]);
        }

        let mut appended = self.state_stack.clone();
        appended.push(frame);

        if is_stack_valid(&appended) {
            debug!(%target, depth = appended.len(), "push extends stack");
            return Self { use_case: self.use_case, state_stack: appended, ..self.clone() };
        }

        let skimmed = skim_stack(&appended);
        debug!(%target, depth = skimmed.len(), "push overflows, skimming stack");
        Self::with_stack(self.use_case, skimmed)
    }
}

// ============================================================================
// Validity and skimming
// ============================================================================

/// Collapse the stack into validity *nodes*: a list frame immediately
/// followed by an instance frame of the same type is one node (the
/// list/detail pair the UI renders as a single level); every other frame
/// stands alone.
fn collapse_nodes(stack: &[WorkflowEntity]) -> Vec<EntityType> {
    let mut nodes = Vec::with_capacity(stack.len());
    let mut i = 0;
    while i < stack.len() {
        let frame = &stack[i];
        nodes.push(frame.entity_type());
        let paired_instance = frame.is_list()
            && stack.get(i + 1).is_some_and(|next| {
                !next.is_list() && next.entity_type() == frame.entity_type()
            });
        i += if paired_instance { 2 } else { 1 };
    }
    nodes
}

/// A hop descends when the target is structurally beneath the source.
/// Parent and match hops do not descend; they are legal only as the
/// final hop of a stack.
fn descends(from: EntityType, to: EntityType) -> bool {
    is_child(from, to) || is_contained(from, to)
}

/// Whether a stack is a coherent drill-down.
///
/// Invalid when a type re-enters the stack in a second node, or when any
/// hop before the final one fails to descend. The final hop may be a
/// parent or match jump — that is exactly the one sideways step a side
/// panel can show — but drilling *past* such a step must overflow, which
/// is what keeps repeated sideways navigation from growing the stack
/// without bound.
fn is_stack_valid(stack: &[WorkflowEntity]) -> bool {
    if stack.len() < 2 {
        return true;
    }

    let nodes = collapse_nodes(stack);
    for (i, t) in nodes.iter().enumerate() {
        if nodes[..i].contains(t) {
            return false;
        }
    }

    // all hops except the last
    for hop in nodes.windows(2).take(nodes.len().saturating_sub(2)) {
        if !descends(hop[0], hop[1]) {
            return false;
        }
    }
    true
}

/// The shortest stack that still anchors the leaf frame.
///
/// A leaf carrying an id stands alone (a related-entity jump lands on a
/// fresh detail page). A leaf list re-anchors to the nearest preceding
/// id-bearing frame, or stands alone when there is none.
fn skim_stack(stack: &[WorkflowEntity]) -> Vec<WorkflowEntity> {
    let Some(leaf) = stack.last() else {
        return Vec::new();
    };
    if leaf.entity_id().is_some() {
        return vec![leaf.clone()];
    }
    match stack[..stack.len() - 1]
        .iter()
        .rev()
        .find(|frame| frame.entity_id().is_some())
    {
        Some(anchor) => vec![anchor.clone(), leaf.clone()],
        None => vec![leaf.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drillnav_catalog::EntityType::*;

    fn list(t: EntityType) -> WorkflowEntity {
        WorkflowEntity::list(t)
    }

    fn inst(t: EntityType, id: &str) -> WorkflowEntity {
        WorkflowEntity::instance(t, id)
    }

    #[test]
    fn collapse_pairs_list_and_instance_of_same_type() {
        let nodes = collapse_nodes(&[
            list(Cluster),
            inst(Cluster, "1"),
            list(Deployment),
            inst(Deployment, "2"),
            list(Policy),
        ]);
        assert_eq!(nodes, vec![Cluster, Deployment, Policy]);
    }

    #[test]
    fn collapse_keeps_bare_instances_standalone() {
        // An instance frame with no preceding same-type list (a
        // related-entity jump) is its own node.
        let nodes = collapse_nodes(&[list(Deployment), inst(Deployment, "1"), inst(Cluster, "2")]);
        assert_eq!(nodes, vec![Deployment, Cluster]);
    }

    #[test]
    fn drill_down_chains_are_valid_at_any_depth() {
        assert!(is_stack_valid(&[
            list(Cluster),
            inst(Cluster, "1"),
            list(Namespace),
            inst(Namespace, "2"),
            list(Deployment),
            inst(Deployment, "3"),
            list(Component),
        ]));
    }

    #[test]
    fn sideways_hop_is_valid_only_as_the_final_hop() {
        // Image -> Deployment is a match: fine as the leaf...
        assert!(is_stack_valid(&[list(Image), inst(Image, "1"), list(Deployment)]));
        // ...but drilling past it must overflow.
        assert!(!is_stack_valid(&[
            list(Image),
            inst(Image, "1"),
            inst(Deployment, "2"),
            list(ServiceAccount),
        ]));
    }

    #[test]
    fn duplicate_type_in_two_nodes_is_invalid() {
        assert!(!is_stack_valid(&[
            list(Deployment),
            inst(Deployment, "1"),
            list(Image),
            inst(Image, "2"),
            list(Deployment),
        ]));
    }

    #[test]
    fn skim_prefers_the_id_bearing_leaf() {
        assert_eq!(
            skim_stack(&[list(Image), inst(Image, "1"), inst(Deployment, "2")]),
            vec![inst(Deployment, "2")]
        );
        assert_eq!(
            skim_stack(&[list(Image), inst(Image, "1"), list(Deployment)]),
            vec![inst(Image, "1"), list(Deployment)]
        );
        assert_eq!(skim_stack(&[list(Image)]), vec![list(Image)]);
    }
}
