//! Structural invariants of an arena tree.

use crate::tree::{ArenaTree, NodeId, Tree};

/// Check structural invariants:
/// - The tree is non-empty and the root has no parent
/// - Every non-root node has a parent edge
/// - Parent edges agree with the parent's child port table
/// - Every node is reachable from the root exactly once
pub fn validate_invariants(tree: &ArenaTree) -> Vec<String> {
    let mut errors = Vec::new();
    if tree.nodes.is_empty() {
        errors.push("tree has no nodes".to_string());
        return errors;
    }

    let root = tree.root();
    if let Some(edge) = tree.nodes[root.0].parent {
        errors.push(format!("root {} has parent {}", root, edge.node));
    }

    for (index, entry) in tree.nodes.iter().enumerate().skip(1) {
        let node = NodeId(index);
        match entry.parent {
            None => errors.push(format!("{}: non-root node has no parent", node)),
            Some(edge) => {
                if tree.child(edge.node, edge.port) != Some(node) {
                    errors.push(format!(
                        "{}: parent edge ({} port {}) does not lead back",
                        node, edge.node, edge.port
                    ));
                }
            }
        }
    }

    let mut seen = vec![false; tree.nodes.len()];
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if seen[node.0] {
            errors.push(format!("{}: reachable more than once", node));
            continue;
        }
        seen[node.0] = true;
        for child in &tree.nodes[node.0].children {
            if child.0 >= tree.nodes.len() {
                errors.push(format!("{}: child {} out of range", node, child));
                continue;
            }
            stack.push(*child);
        }
    }
    for (index, reached) in seen.iter().enumerate() {
        if !reached {
            errors.push(format!("{}: unreachable from root", NodeId(index)));
        }
    }

    errors
}
