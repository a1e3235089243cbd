//! Tests for OrderedCourseStore ordering, overwrite and clear semantics

use rstest::rstest;

use courseplan::domain::{CourseRecord, InsertOutcome, OrderedCourseStore};
use courseplan::util::testing;

fn course(id: &str, title: &str) -> CourseRecord {
    CourseRecord::new(id, title, Vec::<String>::new())
}

fn ids(store: &OrderedCourseStore) -> Vec<String> {
    store.iter().map(|c| c.id.clone()).collect()
}

#[test]
fn given_unsorted_inserts_when_enumerating_then_yields_ascending_ids() {
    testing::init_test_setup();
    let mut store = OrderedCourseStore::new();
    for id in ["CS300", "CS101", "CS200"] {
        store.insert(course(id, "any"));
    }

    assert_eq!(ids(&store), vec!["CS101", "CS200", "CS300"]);
}

#[test]
fn given_same_id_inserted_twice_when_searching_then_last_write_wins() {
    let mut store = OrderedCourseStore::new();
    assert_eq!(store.insert(course("CS101", "Intro")), InsertOutcome::Added);
    assert_eq!(store.insert(course("CS101", "Introduction")), InsertOutcome::Replaced);

    let found = store.search("CS101").expect("CS101 stored");
    assert_eq!(found.title, "Introduction");
    assert_eq!(ids(&store), vec!["CS101"]);
}

#[test]
fn given_identical_record_inserted_twice_when_enumerating_then_appears_once() {
    let mut store = OrderedCourseStore::new();
    let record = CourseRecord::new("CS200", "Data Structures", ["CS101"]);
    store.insert(record.clone());
    store.insert(record.clone());

    assert_eq!(store.in_order(), vec![&record]);
    assert_eq!(store.len(), 1);
}

#[test]
fn given_empty_store_when_querying_then_not_found_and_no_records() {
    let store = OrderedCourseStore::new();

    assert!(store.is_empty());
    assert!(store.search("CS101").is_none());
    assert_eq!(store.iter().count(), 0);
}

#[test]
fn given_prerequisite_never_inserted_when_searching_then_still_returned() {
    let mut store = OrderedCourseStore::new();
    store.insert(CourseRecord::new("CS300", "Algorithms", ["CS250"]));

    let found = store.search("CS300").expect("CS300 stored");
    assert_eq!(found.prerequisites, vec!["CS250"]);
    assert!(!store.contains("CS250"));
}

#[test]
fn given_populated_store_when_clearing_then_empty_with_no_records() {
    let mut store = OrderedCourseStore::new();
    for id in ["B", "A", "C"] {
        store.insert(course(id, id));
    }

    store.clear();

    assert!(store.is_empty());
    assert_eq!(store.iter().count(), 0);
    store.clear();
    assert!(store.is_empty());
}

#[test]
fn given_lookup_when_case_differs_then_store_compares_exactly() {
    let mut store = OrderedCourseStore::new();
    store.insert(course("cs101", "Intro"));

    // records normalize on construction; the store itself is byte-exact
    assert!(store.search("CS101").is_some());
    assert!(store.search("cs101").is_none());
}

#[test]
fn given_byte_order_when_enumerating_then_digits_sort_before_letters() {
    let mut store = OrderedCourseStore::new();
    for id in ["CSA", "CS9", "CS10", "C"] {
        store.insert(course(id, id));
    }
    assert_eq!(ids(&store), vec!["C", "CS10", "CS9", "CSA"]);
}

#[rstest]
#[case(&["CS300", "CS101", "CS200"])]
#[case(&["A", "B", "C", "D", "E", "F"])]
#[case(&["F", "E", "D", "C", "B", "A"])]
#[case(&["M", "C", "X", "A", "E", "Q", "Z", "M", "A"])]
fn given_any_insert_order_when_enumerating_then_strictly_ascending(#[case] order: &[&str]) {
    let mut store = OrderedCourseStore::new();
    for (i, id) in order.iter().enumerate() {
        store.insert(course(id, &format!("title {}", i)));
    }

    let listed = ids(&store);
    assert!(listed.windows(2).all(|w| w[0] < w[1]), "not ascending: {:?}", listed);

    let mut expected: Vec<String> = order.iter().map(|s| s.to_string()).collect();
    expected.sort();
    expected.dedup();
    assert_eq!(listed, expected);
    assert_eq!(store.len(), expected.len());
}

#[test]
fn given_repeated_ids_when_searching_then_returns_last_title_for_each() {
    let mut store = OrderedCourseStore::new();
    let inserts = [("B", "b1"), ("A", "a1"), ("B", "b2"), ("C", "c1"), ("A", "a2")];
    for (id, title) in inserts {
        store.insert(course(id, title));
    }

    assert_eq!(store.search("A").map(|c| c.title.as_str()), Some("a2"));
    assert_eq!(store.search("B").map(|c| c.title.as_str()), Some("b2"));
    assert_eq!(store.search("C").map(|c| c.title.as_str()), Some("c1"));
    assert!(store.search("D").is_none());
}

#[test]
fn given_large_sorted_input_when_traversing_then_does_not_overflow_stack() {
    let mut store = OrderedCourseStore::new();
    for i in 0..5_000 {
        store.insert(course(&format!("C{:06}", i), "t"));
    }

    assert_eq!(store.height(), 5_000);
    assert_eq!(store.iter().count(), 5_000);
    assert_eq!(store.min().map(|c| c.id.as_str()), Some("C000000"));
    store.clear();
    assert!(store.is_empty());
}
