//! Shared fixtures for integration tests

#![allow(dead_code)]

use proptest::prelude::*;
use treemask::{AttentionMask, NodeKind, ParseTree};

/// Tree from the worked example: 14 nodes, height 5
pub const SCENARIO: &str = "(S (NP (D the) (N dog)) (VP (V chased) (NP (D the) (N cat))))";

/// Height-ordered tags of `SCENARIO`
pub const SCENARIO_TAGS: [&str; 14] = [
    "S", "VP", "NP", "NP", "D", "N", "V", "D", "N", "the", "dog", "chased", "the", "cat",
];

pub fn scenario_tree() -> ParseTree {
    ParseTree::from_bracketed(SCENARIO).expect("scenario tree reads")
}

/// Grow a well-formed tree from (parent pick, is leaf) choices.
///
/// Internal nodes left without children receive a padding leaf.
pub fn tree_from_choices(choices: &[(usize, bool)]) -> ParseTree {
    let mut tree = ParseTree::new();
    let root = tree
        .set_root(NodeKind::Internal, "ROOT")
        .expect("root is set once");
    let mut internals = vec![root];

    for (k, &(pick, leaf)) in choices.iter().enumerate() {
        let parent = internals[pick % internals.len()];
        if leaf {
            tree.add_leaf(parent, format!("w{}", k)).expect("leaf attaches");
        } else {
            let id = tree
                .add_internal(parent, format!("X{}", k))
                .expect("internal attaches");
            internals.push(id);
        }
    }

    for &id in &internals {
        let childless = tree.node(id).expect("node exists").children.is_empty();
        if childless {
            tree.add_leaf(id, "pad").expect("pad attaches");
        }
    }

    tree
}

/// Random well-formed trees of up to ~80 nodes
pub fn arb_tree() -> impl Strategy<Value = ParseTree> {
    proptest::collection::vec((any::<usize>(), any::<bool>()), 0..40)
        .prop_map(|choices| tree_from_choices(&choices))
}

/// Members of each group of `mask`, ordered by lowest member
pub fn groups(mask: &AttentionMask) -> Vec<Vec<usize>> {
    (0..mask.size())
        .filter(|&i| (0..i).all(|j| !mask.get(i, j)))
        .map(|i| (0..mask.size()).filter(|&j| mask.get(i, j)).collect())
        .collect()
}

fn snapshot_root() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("TREEMASK_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create snapshot directory");
        }
        std::fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set TREEMASK_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path, expected, actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}
