//! Auxiliary navigation parameters: search filters, sort order, paging.
//!
//! Each parameter kind lives in a [`ParamSlots`] pair. The `page` slot
//! belongs to the base list/detail page; the `side_panel` slot belongs to
//! the overlay stacked on top of it. Keeping the slots apart is what lets
//! closing a side panel (or skimming the stack for a share link) keep or
//! fold the right slice of state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single search-filter value: one term or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::One(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Many(values)
    }
}

/// An ordered search filter: query key to term(s). Keys are the search
/// option names understood by the console's query layer; the engine
/// treats them as opaque.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchFilter(BTreeMap<String, FilterValue>);

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for SearchFilter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One sort criterion: a column/field id plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    pub field: String,
    #[serde(default)]
    pub desc: bool,
}

impl SortOption {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), desc: false }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), desc: true }
    }
}

/// Sort criteria in priority order.
pub type SortSpec = Vec<SortOption>;

/// Zero-based page index into a paged list.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PageCursor(pub u64);

/// Which slot an auxiliary parameter write lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSlot {
    Page,
    SidePanel,
}

/// A page/side-panel pair of optional parameter values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSlots<T> {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub side_panel: Option<T>,
}

impl<T> ParamSlots<T> {
    pub fn empty() -> Self {
        Self { page: None, side_panel: None }
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.side_panel.is_none()
    }

    pub fn get(&self, slot: ParamSlot) -> Option<&T> {
        match slot {
            ParamSlot::Page => self.page.as_ref(),
            ParamSlot::SidePanel => self.side_panel.as_ref(),
        }
    }

    /// Replace one slot, leaving the other untouched.
    pub fn with(mut self, slot: ParamSlot, value: T) -> Self {
        match slot {
            ParamSlot::Page => self.page = Some(value),
            ParamSlot::SidePanel => self.side_panel = Some(value),
        }
        self
    }

    /// Keep the page slot, drop the side-panel slot. Used when the side
    /// panel closes but the base page survives.
    pub fn page_only(self) -> Self {
        Self { page: self.page, side_panel: None }
    }

    /// Move the side-panel slot down into the page slot. Used when a
    /// side panel becomes the page of a skimmed share link.
    pub fn folded_down(self) -> Self {
        Self { page: self.side_panel, side_panel: None }
    }
}
