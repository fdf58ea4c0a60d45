//! History integration tests: imprints on overwrite, listing and restore.

mod common;

use common::{Fixture, TEST_USER};
use metatree::{MetaPath, ResourcePath, Tree};
use serde_json::json;

fn age_path(fx: &Fixture) -> ResourcePath {
    fx.dir("").child(".meta").child("age")
}

#[test]
fn test_history_newest_first() {
    let fx = Fixture::new();
    let mut tree = Tree::new();
    let age = fx.write_entry(&mut tree, "", "age", json!(1));
    for value in [json!(2), json!(3)] {
        fx.tick(5);
        tree.set_value(age, value).unwrap();
        fx.store().flush(&mut tree, age).unwrap();
    }

    let imprints = fx.store().history(&tree, age).unwrap();
    let values: Vec<_> = imprints.iter().map(|i| i.value.clone()).collect();
    assert_eq!(values, vec![json!(2), json!(1)]);
    assert!(imprints.iter().all(|i| i.user == TEST_USER && i.name == "age"));
}

#[test]
fn test_convenience_write_records_history() {
    let fx = Fixture::new();
    let root = fx.dir("");
    fx.store().write(&root, &MetaPath::parse("age"), json!(1)).unwrap();
    fx.tick(1);
    fx.store().write(&root, &MetaPath::parse("age"), json!(2)).unwrap();

    let imprints = fx.store().history_of(&age_path(&fx)).unwrap();
    assert_eq!(imprints.len(), 1);
    assert_eq!(imprints[0].value, json!(1));
}

#[test]
fn test_same_value_records_nothing() {
    let fx = Fixture::new();
    let root = fx.dir("");
    for _ in 0..3 {
        fx.tick(1);
        fx.store().write(&root, &MetaPath::parse("age"), json!(1)).unwrap();
    }
    assert!(fx.store().history_of(&age_path(&fx)).unwrap().is_empty());
}

#[test]
fn test_restore_across_type_change() {
    let fx = Fixture::new();
    let root = fx.dir("");
    fx.store().write(&root, &MetaPath::parse("age"), json!(27)).unwrap();
    fx.tick(1);
    fx.store().write(&root, &MetaPath::parse("age"), json!("old")).unwrap();

    let imprint = fx.store().history_of(&age_path(&fx)).unwrap().remove(0);
    assert_eq!(imprint.suffix.as_deref(), Some("int"));
    let restored = fx.store().restore(&imprint, false).unwrap();

    assert_eq!(restored.basename(), "age.int");
    assert_eq!(fx.read(".meta/age.int"), "27");
    assert!(!fx.path(".meta/age.string").exists());
    assert!(fx.path(".meta/.trash/age.string").exists());
    assert!(fx.store().history_of(&age_path(&fx)).unwrap().is_empty());
}

#[test]
fn test_history_of_collection_children() {
    let fx = Fixture::new();
    let root = fx.dir("");
    fx.store()
        .write(&root, &MetaPath::parse("address/city"), json!("A"))
        .unwrap();
    fx.tick(1);
    fx.store()
        .write(&root, &MetaPath::parse("address/city"), json!("B"))
        .unwrap();

    assert!(fx.path(".meta/address.dict/.history").is_dir());
    let city = root.child(".meta").child("address.dict").child("city");
    let imprints = fx.store().history_of(&city).unwrap();
    assert_eq!(imprints.len(), 1);
    assert_eq!(imprints[0].value, json!("A"));
}
