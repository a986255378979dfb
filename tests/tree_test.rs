//! Behavioral tests for PathTree: read, write, replace, remove

use pathtree::util::testing;
use pathtree::{PathTree, TreeError};
use rstest::{fixture, rstest};

#[fixture]
fn scenario_tree() -> PathTree {
    testing::init_test_setup();
    let mut tree = PathTree::new();
    tree.set_data("/a/b/c", 45).unwrap();
    tree.set_data("/a/b/d", 25).unwrap();
    tree.set_data("/a/b", 19).unwrap();
    tree
}

// ============================================================
// Write / read
// ============================================================

#[rstest]
fn given_nested_writes_when_reading_then_each_path_keeps_its_value(scenario_tree: PathTree) {
    assert_eq!(scenario_tree.get_data("/a/b").unwrap(), 19);
    assert_eq!(scenario_tree.get_data("/a/b/c").unwrap(), 45);
    assert_eq!(scenario_tree.get_data("/a/b/d").unwrap(), 25);
}

#[rstest]
#[case("/x", 1)]
#[case("x", -1)]
#[case("/deep/er/and/deeper/", i64::MAX)]
#[case("//spaced  name//y", i64::MIN)]
#[case("/a/b/c", 0)]
fn given_any_path_when_set_then_get_returns_value(
    mut scenario_tree: PathTree,
    #[case] path: &str,
    #[case] value: i64,
) {
    scenario_tree.set_data(path, value).unwrap();
    assert_eq!(scenario_tree.get_data(path).unwrap(), value);
}

#[rstest]
fn given_existing_path_when_set_again_then_no_node_is_created(mut scenario_tree: PathTree) {
    let before = scenario_tree.len();
    let child_counts: Vec<usize> = ["/", "/a", "/a/b"]
        .iter()
        .map(|p| scenario_tree.get_node(p).unwrap().children().count())
        .collect();

    scenario_tree.set_data("/a/b/c", 100).unwrap();
    scenario_tree.set_data("a/b", 101).unwrap();

    assert_eq!(scenario_tree.len(), before);
    let after: Vec<usize> = ["/", "/a", "/a/b"]
        .iter()
        .map(|p| scenario_tree.get_node(p).unwrap().children().count())
        .collect();
    assert_eq!(after, child_counts);
}

#[rstest]
fn given_partial_prefix_when_set_then_only_missing_suffix_is_created(mut scenario_tree: PathTree) {
    let before = scenario_tree.len();
    scenario_tree.set_data("/a/b/e/f/g", 1).unwrap();
    assert_eq!(scenario_tree.len(), before + 3);
    assert_eq!(scenario_tree.get_data("/a/b/e").unwrap(), 0);
    assert_eq!(scenario_tree.get_data("/a/b/e/f").unwrap(), 0);
}

#[rstest]
#[case("")]
#[case("/")]
fn given_fresh_tree_when_reading_root_then_returns_default(#[case] root: &str) {
    let tree = PathTree::new();
    assert_eq!(tree.get_data(root).unwrap(), 0);
    assert_eq!(tree.len(), 1);
}

#[rstest]
#[case("/missing")]
#[case("/a/b/c/d")]
#[case("/a/c")]
#[case("/A")]
fn given_unwritten_path_when_reading_then_not_found(scenario_tree: PathTree, #[case] path: &str) {
    assert!(matches!(
        scenario_tree.get_data(path),
        Err(TreeError::NotFound(_))
    ));
    assert!(scenario_tree.get_node(path).is_err());
}

#[test]
fn given_new_tree_when_reading_missing_then_not_found() {
    assert_eq!(
        PathTree::new().get_data("/missing"),
        Err(TreeError::NotFound("/missing".to_string()))
    );
}

#[rstest]
fn given_siblings_when_listing_children_then_insertion_order_is_kept() {
    let mut tree = PathTree::new();
    for name in ["zeta", "alpha", "mid"] {
        tree.set_data(&format!("/p/{}", name), 1).unwrap();
    }
    let names: Vec<&str> = tree
        .get_node("/p")
        .unwrap()
        .children()
        .map(|n| n.name())
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

// ============================================================
// Remove
// ============================================================

#[rstest]
fn given_subtree_when_removed_then_descendants_unreachable(mut scenario_tree: PathTree) {
    scenario_tree.remove_node("/a/b").unwrap();

    assert!(matches!(
        scenario_tree.get_data("/a/b/c"),
        Err(TreeError::NotFound(_))
    ));
    assert!(scenario_tree.get_data("/a/b/d").is_err());
    assert!(scenario_tree.get_data("/a/b").is_err());
    assert_eq!(scenario_tree.get_data("/a").unwrap(), 0);
    assert_eq!(scenario_tree.len(), 2);
}

#[rstest]
fn given_middle_sibling_when_removed_then_others_keep_order() {
    let mut tree = PathTree::from_entries([("/s/1", 1), ("/s/2", 2), ("/s/3", 3)]).unwrap();
    tree.remove_node("/s/2").unwrap();
    let names: Vec<&str> = tree
        .get_node("/s")
        .unwrap()
        .children()
        .map(|n| n.name())
        .collect();
    assert_eq!(names, vec!["1", "3"]);
}

#[rstest]
fn given_removed_path_when_written_again_then_recreated_fresh(mut scenario_tree: PathTree) {
    scenario_tree.remove_node("/a/b").unwrap();
    scenario_tree.set_data("/a/b/c", 7).unwrap();
    assert_eq!(scenario_tree.get_data("/a/b").unwrap(), 0);
    assert!(scenario_tree.get_data("/a/b/d").is_err());
}

#[rstest]
#[case("")]
#[case("/")]
fn given_root_when_removed_then_invalid_operation(mut scenario_tree: PathTree, #[case] root: &str) {
    assert!(matches!(
        scenario_tree.remove_node(root),
        Err(TreeError::InvalidOperation(_))
    ));
    assert_eq!(scenario_tree.len(), 5);
}

// ============================================================
// Replace
// ============================================================

#[rstest]
fn given_other_tree_when_set_node_then_subtree_replaced(mut scenario_tree: PathTree) {
    let mut other = PathTree::new();
    other.set_data("/x", 7).unwrap();

    scenario_tree.set_node("/a", other).unwrap();

    assert_eq!(scenario_tree.get_data("/a").unwrap(), 0);
    assert_eq!(scenario_tree.get_data("/a/x").unwrap(), 7);
    assert!(scenario_tree.get_data("/a/b").is_err());
    let a = scenario_tree.get_node("/a").unwrap();
    assert_eq!(a.name(), "a");
    assert_eq!(a.parent().unwrap().path(), "/");
}

#[rstest]
fn given_root_target_when_set_node_then_whole_tree_replaced(mut scenario_tree: PathTree) {
    let other = PathTree::from_entries([("/", 5), ("/k", 6)]).unwrap();
    scenario_tree.set_node("/", other).unwrap();
    assert_eq!(scenario_tree.get_data("/").unwrap(), 5);
    assert_eq!(scenario_tree.get_data("/k").unwrap(), 6);
    assert_eq!(scenario_tree.len(), 2);
}

#[rstest]
fn given_taken_subtree_when_set_elsewhere_then_moved(mut scenario_tree: PathTree) {
    scenario_tree.set_data("/z", 0).unwrap();
    let sub = scenario_tree.take_node("/a/b").unwrap();
    scenario_tree.set_node("/z", sub).unwrap();

    assert_eq!(scenario_tree.get_data("/z").unwrap(), 19);
    assert_eq!(scenario_tree.get_data("/z/c").unwrap(), 45);
    assert!(!scenario_tree.contains("/a/b"));
    assert_eq!(scenario_tree.len(), 5);
}

#[rstest]
fn given_ancestor_target_when_moving_then_ancestor_takes_subtree(mut scenario_tree: PathTree) {
    scenario_tree.move_node("/a/b", "/a").unwrap();
    assert_eq!(scenario_tree.get_data("/a").unwrap(), 19);
    assert_eq!(scenario_tree.get_data("/a/c").unwrap(), 45);
    assert!(!scenario_tree.contains("/a/b"));
}

#[rstest]
#[case("/a", "/a/b")]
#[case("/a/b", "/a/b")]
fn given_descendant_target_when_moving_then_rejected(
    mut scenario_tree: PathTree,
    #[case] from: &str,
    #[case] to: &str,
) {
    assert!(matches!(
        scenario_tree.move_node(from, to),
        Err(TreeError::InvalidOperation(_))
    ));
    assert_eq!(scenario_tree.get_data("/a/b/c").unwrap(), 45);
}

// ============================================================
// Node views
// ============================================================

#[rstest]
fn given_auto_vivified_path_when_counting_then_subtree_len_includes_new_nodes(
    mut scenario_tree: PathTree,
) {
    assert_eq!(scenario_tree.get_node("/a").unwrap().len(), 4);

    scenario_tree.set_data("/a/b/c/x/y", 7).unwrap();

    assert_eq!(scenario_tree.get_node("/a").unwrap().len(), 6);
    assert_eq!(scenario_tree.get_node("/a/b/c").unwrap().len(), 3);
    assert_eq!(scenario_tree.root().len(), scenario_tree.len());
}

#[rstest]
fn given_removed_child_when_counting_then_subtree_len_shrinks(mut scenario_tree: PathTree) {
    scenario_tree.remove_node("/a/b/c").unwrap();

    let b = scenario_tree.get_node("/a/b").unwrap();
    assert_eq!(b.len(), 2);
    assert!(b.child("c").is_none());
    assert_eq!(b.child("d").unwrap().value(), 25);
    assert_eq!(scenario_tree.get_node("/a/b/d").unwrap().len(), 1);
}

#[rstest]
fn given_tree_when_iterating_postorder_then_children_precede_parents(scenario_tree: PathTree) {
    let paths: Vec<String> = scenario_tree
        .iter_postorder()
        .map(|(idx, _)| {
            scenario_tree
                .iter_nodes()
                .find(|n| n.index() == idx)
                .map(|n| n.path())
                .unwrap()
        })
        .collect();
    assert_eq!(paths, vec!["/a/b/c", "/a/b/d", "/a/b", "/a", "/"]);
}

// ============================================================
// Teardown
// ============================================================

#[test]
fn given_very_deep_tree_when_deleted_then_no_stack_overflow() {
    let path = "/n".repeat(200_000);
    let mut tree = PathTree::new();
    tree.set_data(&path, 1).unwrap();
    assert_eq!(tree.depth(), 200_001);
    assert_eq!(tree.get_data(&path).unwrap(), 1);
    tree.remove_node("/n").unwrap();
    assert_eq!(tree.len(), 1);
    tree.delete();
}
