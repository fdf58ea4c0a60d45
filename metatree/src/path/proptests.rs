//! Property-based tests for path handling.

use super::normalize::normalize_str;
use super::{MetaPath, ResourcePath, CONTAINER};
use proptest::prelude::*;

fn component_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,12}"
}

fn suffix_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("int".to_string()),
        Just("float".to_string()),
        Just("string".to_string()),
        Just("dict".to_string()),
        Just("list".to_string()),
    ]
}

fn absolute_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(component_strategy(), 1..8).prop_map(|parts| format!("/{}", parts.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Normalization is idempotent
    #[test]
    fn normalization_idempotent(path in absolute_path_strategy(), noise in "[./]{0,6}") {
        let raw = format!("{path}/{noise}");
        if let Ok(once) = normalize_str(&raw) {
            let twice = normalize_str(&once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    // Absolute normalized paths never contain "." or ".." segments
    #[test]
    fn absolute_paths_have_no_dot_segments(path in absolute_path_strategy(), tail in "(\\.\\./|\\./|[a-z]/){0,6}") {
        let normalized = normalize_str(&format!("{path}/{tail}")).unwrap();
        prop_assert!(!normalized.split('/').any(|s| s == "." || s == ".."));
    }

    // Replacing a suffix keeps the key and the parent
    #[test]
    fn with_suffix_preserves_key(path in absolute_path_strategy(), suffix in suffix_strategy()) {
        let original = ResourcePath::parse(&path).unwrap();
        let changed = original.with_suffix(&suffix);
        prop_assert_eq!(changed.key(), original.key());
        prop_assert_eq!(changed.parent(), original.parent());
        prop_assert_eq!(changed.suffix(), Some(suffix.as_str()));
    }

    // child(x).parent() is the original path
    #[test]
    fn child_parent_inverse(path in absolute_path_strategy(), name in component_strategy()) {
        let parent = ResourcePath::parse(&path).unwrap();
        prop_assert_eq!(parent.child(&name).parent(), Some(parent));
    }

    // Entries under a container resolve back to their location and metapath
    #[test]
    fn meta_and_location_round_trip(
        location in absolute_path_strategy(),
        parts in prop::collection::vec((component_strategy(), suffix_strategy()), 1..5),
    ) {
        let mut path = ResourcePath::parse(&location).unwrap().child(CONTAINER);
        let mut expected = MetaPath::root();
        for (name, suffix) in &parts {
            path = path.child(&format!("{name}.{suffix}"));
            expected = expected.join(name);
        }
        prop_assert_eq!(path.location(), ResourcePath::parse(&location).unwrap());
        prop_assert_eq!(path.meta(), Some(expected));
    }
}
