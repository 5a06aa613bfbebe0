//! Round-trip property tests: any state the navigation model can
//! produce (with encodable auxiliary values) survives a trip through the
//! URL codec, and arbitrary garbage never makes the decoder panic.

use drillnav_catalog::{EntityType, UseCase};
use drillnav_state::{
    FilterValue, PageCursor, ParamSlots, SearchFilter, SortOption, SortSpec, WorkflowState,
};
use drillnav_url::{parse_workflow_url, to_url, try_parse_workflow_url};
use proptest::prelude::*;

fn entity_type_strategy() -> impl Strategy<Value = EntityType> {
    prop::sample::select(EntityType::ALL.to_vec())
}

fn use_case_strategy() -> impl Strategy<Value = UseCase> {
    prop::sample::select(UseCase::ALL.to_vec())
}

// Ids as the console mints them: nonempty, occasionally with the
// separators (`:`, `/`, `.`) that composite image/component keys use.
fn id_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9:/._-]{0,24}"
}

fn filter_strategy() -> impl Strategy<Value = SearchFilter> + Clone {
    prop::collection::btree_map(
        "[A-Za-z][A-Za-z0-9 ]{0,12}",
        prop_oneof![
            "[A-Za-z0-9 ._:-]{1,16}".prop_map(FilterValue::One),
            prop::collection::vec("[A-Za-z0-9 ._:-]{1,16}", 2..4).prop_map(FilterValue::Many),
        ],
        1..4,
    )
    .prop_map(|terms| terms.into_iter().collect())
}

fn sort_strategy() -> impl Strategy<Value = SortSpec> + Clone {
    prop::collection::vec(
        ("[A-Za-z][A-Za-z0-9 ]{0,12}", any::<bool>())
            .prop_map(|(field, desc)| SortOption { field, desc }),
        1..3,
    )
}

fn slots_strategy<T: std::fmt::Debug + Clone>(
    value: impl Strategy<Value = T> + Clone,
) -> impl Strategy<Value = ParamSlots<T>> {
    (prop::option::of(value.clone()), prop::option::of(value))
        .prop_map(|(page, side_panel)| ParamSlots { page, side_panel })
}

/// Build a state through the model itself, so only reachable stacks are
/// generated.
fn state_strategy() -> impl Strategy<Value = WorkflowState> {
    (
        use_case_strategy(),
        prop::collection::vec((entity_type_strategy(), prop::option::of(id_strategy())), 0..6),
        slots_strategy(filter_strategy()),
        slots_strategy(sort_strategy()),
        slots_strategy((0u64..500).prop_map(PageCursor)),
    )
        .prop_map(|(use_case, pushes, search, sort, paging)| {
            let mut state = WorkflowState::new(use_case);
            for (entity_type, id) in pushes {
                state = match id {
                    Some(id) => state.push_related_entity(entity_type, id),
                    None => state.push_list(entity_type),
                };
            }
            WorkflowState::from_parts(
                use_case,
                state.state_stack().to_vec(),
                search,
                sort,
                paging,
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn reachable_states_round_trip(state in state_strategy()) {
        let url = to_url(&state);
        let decoded = try_parse_workflow_url(&url);
        prop_assert_eq!(decoded.as_ref(), Ok(&state), "url was {}", url);
    }

    #[test]
    fn decoding_arbitrary_input_never_panics(input in ".{0,120}") {
        let _ = parse_workflow_url(&input);
    }

    #[test]
    fn decoding_mangled_valid_urls_never_panics(
        state in state_strategy(),
        cut in 0usize..64,
    ) {
        let url = to_url(&state);
        let cut = cut.min(url.len());
        // truncating at a char boundary simulates a copy-paste accident
        if url.is_char_boundary(cut) {
            let _ = parse_workflow_url(&url[..cut]);
        }
    }
}
