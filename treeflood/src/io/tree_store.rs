//! Tree load/save helpers with invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::invariants::validate_invariants;
use crate::tree::{ArenaTree, NodeSpec};

/// Load a nested JSON tree file and build a validated arena from it.
pub fn load_tree(tree_path: &Path) -> Result<ArenaTree> {
    let contents = fs::read_to_string(tree_path)
        .with_context(|| format!("read tree {}", tree_path.display()))?;
    let spec: NodeSpec = serde_json::from_str(&contents)
        .with_context(|| format!("parse tree {}", tree_path.display()))?;
    let tree = ArenaTree::from_spec(&spec);
    validate_tree_invariants(&tree)?;
    debug!(path = %tree_path.display(), nodes = spec.count(), "tree loaded");
    Ok(tree)
}

/// Write a tree as pretty JSON with a trailing newline.
pub fn write_tree(tree_path: &Path, spec: &NodeSpec) -> Result<()> {
    if let Some(parent) = tree_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut buf = serde_json::to_string_pretty(spec)?;
    buf.push('\n');
    fs::write(tree_path, buf).with_context(|| format!("write tree {}", tree_path.display()))
}

fn validate_tree_invariants(tree: &ArenaTree) -> Result<()> {
    let errors = validate_invariants(tree);
    if errors.is_empty() {
        return Ok(());
    }
    Err(anyhow!("tree invariants failed: {}", errors.join("; ")))
}
