//! Property-based tests for the flush/pull cycle.

use super::{PullOptions, Store};
use crate::fs::{MemoryFs, OsFs};
use crate::kind::ValueKind;
use crate::logging::Logger;
use crate::path::ResourcePath;
use crate::tree::Tree;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::path::Path;

fn store() -> Store<MemoryFs> {
    let fs = MemoryFs::new();
    fs.mkdir_all(Path::new("/r")).unwrap();
    Store::with_fs(fs).with_logger(Logger::silent())
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(|f| json!(f)),
        "[ -~]{0,24}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    // The suffix read back is the one inferred at write time
    #[test]
    fn suffix_survives_flush_and_pull(value in scalar_strategy()) {
        let store = store();
        let mut tree = Tree::new();
        let loc = tree.add_location(&ResourcePath::parse("/r").unwrap()).unwrap();
        let entry = tree.add_entry("value", Some(loc)).unwrap();
        tree.set_value(entry, value.clone()).unwrap();
        let written = tree.suffix(entry).map(str::to_string);
        store.flush(&mut tree, entry).unwrap();

        let mut fresh = Tree::new();
        let loc = fresh.add_location(&ResourcePath::parse("/r").unwrap()).unwrap();
        let entry = fresh.add_entry("value", Some(loc)).unwrap();
        store.pull(&mut fresh, entry, PullOptions::default()).unwrap();

        prop_assert_eq!(fresh.suffix(entry).map(str::to_string), written.clone());
        prop_assert_eq!(
            written.as_deref().and_then(ValueKind::from_suffix),
            Some(ValueKind::infer(&value, None))
        );
        prop_assert_eq!(fresh.value(entry), value);
    }

    // However often a name is retyped, one entry of that name remains
    #[test]
    fn one_entry_per_name(values in prop::collection::vec(scalar_strategy(), 1..6)) {
        let store = store();
        let mut tree = Tree::new();
        let loc = tree.add_location(&ResourcePath::parse("/r").unwrap()).unwrap();
        let entry = tree.add_entry("value", Some(loc)).unwrap();
        for value in values {
            tree.set_value(entry, value).unwrap();
            store.flush(&mut tree, entry).unwrap();
            let matches = store.find_all(&ResourcePath::parse("/r/.meta").unwrap(), "value").unwrap();
            prop_assert_eq!(matches.len(), 1);
        }
    }
}
