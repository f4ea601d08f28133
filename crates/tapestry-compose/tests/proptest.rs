//! Property-based tests for composition using proptest.

use proptest::prelude::*;
use serde_json::{json, Value};
use tapestry_compose::{
    CapabilityStore, DeepMerge, Fragment, LastWins, Merger, Pipeline, ResolvedArgs, Strict,
};

// ============================================================================
// Test helpers
// ============================================================================

/// A capability entry as generated: name plus an optional (value, enabled)
/// pair; `None` means declared-but-unset.
type Entry = (String, Option<(i64, bool)>);

fn entry_strategy() -> impl Strategy<Value = Entry> {
    (
        "[a-z]{1,8}".prop_filter("cfg is reserved", |name| name != "cfg"),
        proptest::option::of((any::<i64>(), any::<bool>())),
    )
}

fn build_store(entries: &[Entry]) -> CapabilityStore {
    let mut store = CapabilityStore::new();
    for (name, state) in entries {
        store = match state {
            None => store.declare(name.clone()),
            Some((value, enabled)) => {
                store.provide_flagged(name.clone(), json!(value), *enabled)
            }
        };
    }
    store
}

fn echo_fragment(deps: Vec<String>) -> Fragment {
    Fragment::new(deps, |args: &ResolvedArgs| {
        let mut map = serde_json::Map::new();
        for name in args.names() {
            map.insert(name.to_string(), args.get(name).unwrap().clone());
        }
        Ok(Value::Object(map))
    })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Evaluating the same pipeline against the same store twice gives the
    /// same tree.
    #[test]
    fn evaluation_is_deterministic(
        entries in prop::collection::vec(entry_strategy(), 0..8),
    ) {
        let store = build_store(&entries);
        let deps: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
        let pipeline = Pipeline::new()
            .general(echo_fragment(deps.clone()))
            .element(echo_fragment(deps));

        let own = json!({ "enable": true });
        let first = pipeline.evaluate(&store, &own).unwrap();
        let second = pipeline.evaluate(&store, &own).unwrap();
        prop_assert_eq!(first, second);
    }

    /// A gated fragment activates iff every dependency is set and enabled.
    #[test]
    fn gate_is_all_or_nothing(
        entries in prop::collection::vec(entry_strategy(), 1..8),
    ) {
        let store = build_store(&entries);
        let deps: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
        let pipeline = Pipeline::new().element(Fragment::new(
            deps.clone(),
            |_: &ResolvedArgs| Ok(json!({ "activated": true })),
        ));

        let tree = pipeline.evaluate(&store, &json!({})).unwrap();

        // Duplicate names collapse in the store; judge against its state.
        let should_activate = deps
            .iter()
            .all(|name| store.get(name).is_some_and(|cap| cap.is_enabled()));
        let activated = tree != json!({});
        prop_assert_eq!(activated, should_activate);
    }

    /// Declaring `_name` resolves and gates exactly like declaring `name`.
    #[test]
    fn underscore_alias_is_equivalent(
        entries in prop::collection::vec(entry_strategy(), 1..6),
    ) {
        let store = build_store(&entries);
        let (name, _) = &entries[0];

        let plain = Pipeline::new()
            .element(Fragment::new([name.clone()], |_: &ResolvedArgs| {
                Ok(json!({ "on": true }))
            }))
            .evaluate(&store, &json!({}))
            .unwrap();
        let marked = Pipeline::new()
            .element(Fragment::new([format!("_{}", name)], |_: &ResolvedArgs| {
                Ok(json!({ "on": true }))
            }))
            .evaluate(&store, &json!({}))
            .unwrap();

        prop_assert_eq!(plain, marked);
    }

    /// The general fragment receives exactly the set dependencies.
    #[test]
    fn general_fragment_sees_set_subset(
        entries in prop::collection::vec(entry_strategy(), 0..8),
    ) {
        let store = build_store(&entries);
        let deps: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
        let pipeline = Pipeline::new().general(echo_fragment(deps.clone()));

        let tree = pipeline.evaluate(&store, &json!({})).unwrap();
        let echoed = tree.as_object().unwrap();

        for name in &deps {
            let set = store.get(name).is_some_and(|cap| cap.is_set());
            prop_assert_eq!(echoed.contains_key(name), set);
        }
    }

    /// Merging a single tree is the identity.
    #[test]
    fn combine_single_tree_is_identity(
        keys in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8),
    ) {
        let tree = Value::Object(
            keys.iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect(),
        );
        let combined = DeepMerge::new().combine(vec![tree.clone()]).unwrap();
        prop_assert_eq!(combined, tree);
    }

    /// Under LastWins, the final value at a key is the last tree's value.
    #[test]
    fn last_wins_takes_final_value(
        values in prop::collection::vec(any::<i64>(), 1..6),
    ) {
        let trees: Vec<Value> = values.iter().map(|v| json!({ "key": v })).collect();
        let merged = DeepMerge::with_resolver(LastWins).combine(trees).unwrap();
        prop_assert_eq!(merged, json!({ "key": values[values.len() - 1] }));
    }

    /// Strict merging of disjoint trees never conflicts.
    #[test]
    fn strict_accepts_disjoint_trees(
        keys in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8),
    ) {
        // One single-key tree per entry; all keys distinct by construction.
        let trees: Vec<Value> = keys
            .iter()
            .map(|(k, v)| {
                let mut tree = serde_json::Map::new();
                tree.insert(k.clone(), json!(v));
                Value::Object(tree)
            })
            .collect();
        let merged = DeepMerge::with_resolver(Strict).combine(trees).unwrap();
        prop_assert_eq!(merged.as_object().unwrap().len(), keys.len());
    }
}
