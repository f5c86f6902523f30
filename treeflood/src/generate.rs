//! Seeded random tree generation.

use anyhow::{Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tree::NodeSpec;

/// Random recursive tree with `nodes` nodes.
///
/// Node `i > 0` hangs below a uniformly chosen earlier node, which keeps the
/// expected depth logarithmic. The same seed always yields the same tree.
pub fn random_tree(nodes: usize, seed: u64) -> Result<NodeSpec> {
    if nodes == 0 {
        return Err(anyhow!("a tree needs at least one node"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes];
    for index in 1..nodes {
        let parent = rng.gen_range(0..index);
        children[parent].push(index);
    }

    // Children always have larger indices than their parent, so building from
    // the back finishes every subtree before it is attached.
    let mut built: Vec<Option<NodeSpec>> = vec![None; nodes];
    for index in (0..nodes).rev() {
        let subtrees = children[index]
            .iter()
            .map(|child| {
                built[*child]
                    .take()
                    .ok_or_else(|| anyhow!("subtree {child} attached twice"))
            })
            .collect::<Result<Vec<_>>>()?;
        built[index] = Some(NodeSpec::with_children(subtrees));
    }

    built[0]
        .take()
        .ok_or_else(|| anyhow!("generated tree has no root"))
}
