//! Encoding and decoding of workflow state to a path + query string.
//!
//! Path: `/<use-case>/<segments...>` mirroring the state stack, list
//! frames as plural slugs and instance frames as singular slug + id.
//! Query: `s`/`sort`/`p` carry the page slot, `s2`/`sort2`/`p2` the side
//! panel slot, so the two never collide.
//!
//! URLs are untrusted input (stale bookmarks, hand-edited locations), so
//! decoding never panics and never partially succeeds: a malformed path
//! degrades to the empty dashboard state, and unparseable query entries
//! are dropped individually.

use std::collections::BTreeMap;

use drillnav_catalog::UseCase;
use drillnav_state::{
    FilterValue, PageCursor, ParamSlots, SearchFilter, SortOption, SortSpec, WorkflowEntity,
    WorkflowState,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;
use tracing::debug;
use url::form_urlencoded;

use crate::slug;

/// Where a URL lands when its use-case segment is missing or unknown.
pub const DEFAULT_USE_CASE: UseCase = UseCase::VulnerabilityManagement;

/// Characters escaped inside an id path segment. `%` must be escaped so
/// decoding is the exact inverse; `/` so composite ids (image shas,
/// component `name:version` keys) cannot split into extra segments.
const ID_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%')
    .add(b'\\');

/// Why a workflow URL failed to decode. Navigation never sees these —
/// [`parse_workflow_url`] degrades instead — but diagnostics (the CLI)
/// do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("workflow url has no use-case segment")]
    MissingUseCase,
    #[error("unknown use case segment {0:?}")]
    UnknownUseCase(String),
    #[error("unknown entity segment {0:?}")]
    UnknownEntitySegment(String),
    #[error("entity segment {0:?} is missing its id")]
    MissingEntityId(String),
    #[error("invalid percent-encoding in id segment {0:?}")]
    InvalidIdEncoding(String),
}

// ============================================================================
// Encoding
// ============================================================================

/// Render a state as a root-relative URL (path + query string).
pub fn to_url(state: &WorkflowState) -> String {
    let mut out = String::from("/");
    out.push_str(state.use_case().as_str());

    for frame in state.state_stack() {
        out.push('/');
        match frame.entity_id() {
            None => out.push_str(slug::plural(frame.entity_type())),
            Some(id) => {
                out.push_str(slug::singular(frame.entity_type()));
                out.push('/');
                out.extend(utf8_percent_encode(id.as_str(), ID_SEGMENT));
            }
        }
    }

    let query = encode_query(state);
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query);
    }
    out
}

fn encode_query(state: &WorkflowState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if let Some(filter) = &state.search().page {
        append_search(&mut serializer, "s", filter);
    }
    if let Some(filter) = &state.search().side_panel {
        append_search(&mut serializer, "s2", filter);
    }
    if let Some(sort) = &state.sort().page {
        append_sort(&mut serializer, "sort", sort);
    }
    if let Some(sort) = &state.sort().side_panel {
        append_sort(&mut serializer, "sort2", sort);
    }
    if let Some(PageCursor(page)) = state.paging().page {
        serializer.append_pair("p", &page.to_string());
    }
    if let Some(PageCursor(page)) = state.paging().side_panel {
        serializer.append_pair("p2", &page.to_string());
    }

    serializer.finish()
}

fn append_search(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    prefix: &str,
    filter: &SearchFilter,
) {
    for (key, value) in filter.entries() {
        let name = format!("{prefix}[{key}]");
        match value {
            FilterValue::One(v) => {
                serializer.append_pair(&name, v);
            }
            FilterValue::Many(vs) => {
                for v in vs {
                    serializer.append_pair(&name, v);
                }
            }
        }
    }
}

fn append_sort(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    prefix: &str,
    sort: &SortSpec,
) {
    for (index, option) in sort.iter().enumerate() {
        serializer.append_pair(&format!("{prefix}[{index}][id]"), &option.field);
        serializer.append_pair(
            &format!("{prefix}[{index}][desc]"),
            if option.desc { "true" } else { "false" },
        );
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a workflow URL, degrading to the empty dashboard state on any
/// malformed path. This is the entrypoint navigation uses: bad input
/// must land somewhere sane, not crash the router.
pub fn parse_workflow_url(input: &str) -> WorkflowState {
    match try_parse_workflow_url(input) {
        Ok(state) => state,
        Err(error) => {
            debug!(%error, url = input, "degrading malformed workflow url to empty state");
            let use_case = use_case_of(input).unwrap_or(DEFAULT_USE_CASE);
            WorkflowState::new(use_case)
        }
    }
}

/// Decode a workflow URL, surfacing the reason when the path is
/// malformed. Query entries that fail to parse are dropped silently in
/// both variants.
pub fn try_parse_workflow_url(input: &str) -> Result<WorkflowState, DecodeError> {
    let (path, query) = split_path_query(input);
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    let use_case_segment = segments.next().ok_or(DecodeError::MissingUseCase)?;
    let use_case = use_case_segment
        .parse::<UseCase>()
        .map_err(|_| DecodeError::UnknownUseCase(use_case_segment.to_string()))?;

    let mut stack = Vec::new();
    while let Some(segment) = segments.next() {
        if let Some(t) = slug::from_plural(segment) {
            stack.push(WorkflowEntity::list(t));
        } else if let Some(t) = slug::from_singular(segment) {
            let raw_id = segments
                .next()
                .ok_or_else(|| DecodeError::MissingEntityId(segment.to_string()))?;
            let id = percent_decode_str(raw_id)
                .decode_utf8()
                .map_err(|_| DecodeError::InvalidIdEncoding(raw_id.to_string()))?;
            stack.push(WorkflowEntity::instance(t, id.into_owned()));
        } else {
            return Err(DecodeError::UnknownEntitySegment(segment.to_string()));
        }
    }

    let (search, sort, paging) = decode_query(query.unwrap_or(""));
    Ok(WorkflowState::from_parts(use_case, stack, search, sort, paging))
}

/// Use case of a URL whose later segments may be garbage. Lets the
/// degraded state at least stay in the product area the link named.
fn use_case_of(input: &str) -> Option<UseCase> {
    let (path, _) = split_path_query(input);
    path.split('/').find(|s| !s.is_empty())?.parse().ok()
}

/// Split an absolute or root-relative URL into path and query,
/// discarding scheme, host, and fragment.
fn split_path_query(input: &str) -> (&str, Option<&str>) {
    let input = input.split('#').next().unwrap_or("");
    let after_host = match input.find("://") {
        Some(scheme_end) => {
            let host = &input[scheme_end + 3..];
            match host.find('/') {
                Some(slash) => &host[slash..],
                None => "",
            }
        }
        None => input,
    };
    match after_host.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (after_host, None),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum QueryKey {
    Search { side_panel: bool, key: String },
    SortId { side_panel: bool, index: usize },
    SortDesc { side_panel: bool, index: usize },
    Page { side_panel: bool },
}

fn parse_query_key(raw: &str) -> Option<QueryKey> {
    match raw {
        "p" => return Some(QueryKey::Page { side_panel: false }),
        "p2" => return Some(QueryKey::Page { side_panel: true }),
        _ => {}
    }

    let open = raw.find('[')?;
    let (prefix, bracketed) = raw.split_at(open);
    match prefix {
        "s" | "s2" => {
            // the filter key is everything between the first `[` and the
            // final `]`; filter keys may themselves contain brackets
            let key = bracketed.strip_prefix('[')?.strip_suffix(']')?;
            Some(QueryKey::Search { side_panel: prefix == "s2", key: key.to_string() })
        }
        "sort" | "sort2" => {
            let side_panel = prefix == "sort2";
            let rest = bracketed.strip_prefix('[')?;
            let close = rest.find(']')?;
            let index = rest[..close].parse::<usize>().ok()?;
            match &rest[close..] {
                "][id]" => Some(QueryKey::SortId { side_panel, index }),
                "][desc]" => Some(QueryKey::SortDesc { side_panel, index }),
                _ => None,
            }
        }
        _ => None,
    }
}

#[derive(Default)]
struct SortAccumulator {
    fields: BTreeMap<usize, String>,
    descs: BTreeMap<usize, bool>,
}

impl SortAccumulator {
    fn finish(self) -> Option<SortSpec> {
        let spec: SortSpec = self
            .fields
            .into_iter()
            .map(|(index, field)| SortOption {
                field,
                desc: self.descs.get(&index).copied().unwrap_or(false),
            })
            .collect();
        if spec.is_empty() {
            None
        } else {
            Some(spec)
        }
    }
}

fn decode_query(
    query: &str,
) -> (
    ParamSlots<SearchFilter>,
    ParamSlots<SortSpec>,
    ParamSlots<PageCursor>,
) {
    let mut search_terms: [BTreeMap<String, Vec<String>>; 2] = Default::default();
    let mut sorts: [SortAccumulator; 2] = Default::default();
    let mut pages: [Option<PageCursor>; 2] = [None, None];

    for (raw_key, value) in form_urlencoded::parse(query.as_bytes()) {
        let Some(key) = parse_query_key(&raw_key) else {
            continue;
        };
        match key {
            QueryKey::Search { side_panel, key } => {
                search_terms[side_panel as usize]
                    .entry(key)
                    .or_default()
                    .push(value.into_owned());
            }
            QueryKey::SortId { side_panel, index } => {
                sorts[side_panel as usize].fields.insert(index, value.into_owned());
            }
            QueryKey::SortDesc { side_panel, index } => {
                if let Ok(desc) = value.parse::<bool>() {
                    sorts[side_panel as usize].descs.insert(index, desc);
                }
            }
            QueryKey::Page { side_panel } => {
                if let Ok(page) = value.parse::<u64>() {
                    pages[side_panel as usize] = Some(PageCursor(page));
                }
            }
        }
    }

    let [page_terms, panel_terms] = search_terms;
    let [page_sort, panel_sort] = sorts;
    let [page_cursor, panel_cursor] = pages;
    (
        ParamSlots {
            page: build_filter(page_terms),
            side_panel: build_filter(panel_terms),
        },
        ParamSlots { page: page_sort.finish(), side_panel: panel_sort.finish() },
        ParamSlots { page: page_cursor, side_panel: panel_cursor },
    )
}

fn build_filter(terms: BTreeMap<String, Vec<String>>) -> Option<SearchFilter> {
    if terms.is_empty() {
        return None;
    }
    Some(
        terms
            .into_iter()
            .map(|(key, mut values)| {
                if values.len() == 1 {
                    (key, FilterValue::One(values.remove(0)))
                } else {
                    (key, FilterValue::Many(values))
                }
            })
            .collect(),
    )
}
