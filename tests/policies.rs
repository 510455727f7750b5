//! Layer-count floor and edge-policy selection

mod common;

use common::*;
use test_case::test_case;
use treemask::{tree_to_masks, EdgePolicy, MaskConfig, MaskError, ParseTree};

#[test_case(0, 5 ; "no floor uses tree height")]
#[test_case(5, 5 ; "floor equal to height")]
#[test_case(12, 12 ; "default floor")]
#[test_case(30, 30 ; "deep floor")]
fn scenario_layer_count(min_depth: usize, expected: usize) {
    let config = MaskConfig::default().with_min_layer_depth(min_depth);
    let stack = tree_to_masks(&scenario_tree(), &config).unwrap();
    assert_eq!(stack.layer_count(), expected);
}

#[test_case(EdgePolicy::ParentHeight ; "parent height")]
#[test_case(EdgePolicy::SelfHeight ; "self height")]
fn single_leaf_tree(policy: EdgePolicy) {
    let tree = ParseTree::from_bracketed("alone").unwrap();
    let stack = tree_to_masks(&tree, &MaskConfig::default().with_policy(policy)).unwrap();

    assert_eq!(stack.tree_height(), 1);
    assert_eq!(stack.layer_count(), 12);
    for mask in stack.masks() {
        assert_eq!(mask.size(), 1);
        assert!(mask.is_all_true());
    }
}

#[test]
fn one_internal_node_with_leaves() {
    let tree = ParseTree::from_bracketed("(NP a b c)").unwrap();
    let stack = tree_to_masks(&tree, &MaskConfig::default()).unwrap();

    assert_eq!(stack.tree_height(), 2);
    assert_eq!(groups(stack.layer(0).unwrap()).len(), 4);
    assert!(stack.layer(1).unwrap().is_all_true());
}

#[test]
fn policy_reaches_the_stack() {
    let config = MaskConfig::default().with_policy(EdgePolicy::SelfHeight);
    let stack = tree_to_masks(&scenario_tree(), &config).unwrap();
    assert_eq!(stack.policy(), EdgePolicy::SelfHeight);
}

#[test]
fn malformed_input_returns_no_stack() {
    let config = MaskConfig::default();

    assert!(matches!(
        tree_to_masks(&ParseTree::new(), &config),
        Err(MaskError::MalformedTree { .. })
    ));
    assert!(matches!(
        tree_to_masks(&ParseTree::from_bracketed("(S (NP) (VP ran))").unwrap(), &config),
        Err(MaskError::MalformedTree { .. })
    ));
    assert!(matches!(
        tree_to_masks(&scenario_tree(), &config.clone().with_n_head(0)),
        Err(MaskError::InvalidConfiguration(_))
    ));
}
