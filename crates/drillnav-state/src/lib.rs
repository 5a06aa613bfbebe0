//! Immutable navigation stack model for drill-down workflows.
//!
//! The single source of truth for "where the user currently is" in a
//! console drill-down, and for how a requested navigation combines with
//! where they already are. Consumes the static relationship graph from
//! `drillnav-catalog`; produces new [`WorkflowState`] values that the URL
//! codec and the (out-of-scope) rendering layer read.
//!
//! The model is pure and synchronous: no I/O, no interior mutability, no
//! suspension points. Callers must derive each next state from the latest
//! committed state rather than a cached copy; that discipline is theirs,
//! not ours.

pub mod params;
pub mod workflow_entity;
pub mod workflow_state;

pub use params::{FilterValue, PageCursor, ParamSlot, ParamSlots, SearchFilter, SortOption, SortSpec};
pub use workflow_entity::{EntityId, WorkflowEntity};
pub use workflow_state::WorkflowState;
