//! Structural properties of mask stacks over random trees

mod common;

use common::*;
use proptest::prelude::*;
use treemask::{EdgePolicy, MaskConfig, TreeMasker};

fn policies() -> impl Strategy<Value = EdgePolicy> {
    prop_oneof![Just(EdgePolicy::ParentHeight), Just(EdgePolicy::SelfHeight)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stack_dimensions_match_tree(
        tree in arb_tree(),
        min_depth in 0usize..16,
        policy in policies(),
    ) {
        let config = MaskConfig::default().with_min_layer_depth(min_depth).with_policy(policy);
        let stack = TreeMasker::new(config).unwrap().build(&tree).unwrap();

        prop_assert_eq!(stack.node_count(), tree.len());
        prop_assert_eq!(stack.tree_height(), tree.height());
        prop_assert_eq!(stack.layer_count(), tree.height().max(min_depth));
        prop_assert_eq!(stack.tags()[0].as_str(), "ROOT");
        prop_assert!(stack.heights().windows(2).all(|w| w[0] >= w[1]), "heights must not increase");
    }

    #[test]
    fn masks_are_equivalence_relations(tree in arb_tree(), policy in policies()) {
        let config = MaskConfig::default().with_policy(policy);
        let stack = TreeMasker::new(config).unwrap().build(&tree).unwrap();

        for (layer, mask) in stack.masks().iter().enumerate() {
            prop_assert!(mask.is_reflexive(), "layer {} not reflexive", layer);
            prop_assert!(mask.is_symmetric(), "layer {} not symmetric", layer);

            // Transitive: nodes that attend share identical rows
            for i in 0..mask.size() {
                for j in 0..mask.size() {
                    if mask.get(i, j) {
                        prop_assert_eq!(mask.row(i), mask.row(j));
                    }
                }
            }
        }
    }

    #[test]
    fn layers_coarsen_monotonically(tree in arb_tree(), policy in policies()) {
        let config = MaskConfig::default().with_policy(policy);
        let stack = TreeMasker::new(config).unwrap().build(&tree).unwrap();

        prop_assert!(stack.is_monotonic());
        let counts = stack.group_counts();
        prop_assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn top_layers_are_all_true(tree in arb_tree(), policy in policies()) {
        let config = MaskConfig::default().with_min_layer_depth(20).with_policy(policy);
        let stack = TreeMasker::new(config).unwrap().build(&tree).unwrap();
        let height = stack.tree_height();

        for layer in height.saturating_sub(1)..stack.layer_count() {
            prop_assert!(stack.layer(layer).unwrap().is_all_true(), "layer {} of height {}", layer, height);
        }
    }

    #[test]
    fn rebuilding_is_bit_identical(tree in arb_tree(), policy in policies()) {
        let masker = TreeMasker::new(MaskConfig::default().with_policy(policy)).unwrap();
        let first = masker.build(&tree).unwrap();
        let second = masker.build(&tree).unwrap();

        prop_assert_eq!(first.fingerprint(), second.fingerprint());
        prop_assert_eq!(first, second);
    }
}
