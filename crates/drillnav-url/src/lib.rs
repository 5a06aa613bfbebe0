//! URL codec for workflow navigation state.
//!
//! Maps a `drillnav_state::WorkflowState` to and from a path + query
//! string so navigation survives reloads and bookmarks and composes with
//! an external router. Encoding is infallible; decoding treats its input
//! as untrusted and degrades to the empty dashboard state instead of
//! erroring into the navigation layer.

pub mod codec;
pub mod slug;

pub use codec::{
    parse_workflow_url, to_url, try_parse_workflow_url, DecodeError, DEFAULT_USE_CASE,
};
