//! Per-node knowledge derived from a log snapshot.
//!
//! Knowledge is never stored. Every robot rebuilds it from the snapshot it
//! read at its current node, so two robots reading the same snapshot in the
//! same round derive identical knowledge.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::directive::{EnteredVia, Port};
use crate::core::record::LogSnapshot;

/// Derived view of a node for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Knowledge {
    pub round: u64,
    /// Port at the parent leading down to this node. `None` at the root.
    pub parent_port: Option<Port>,
    /// Child ports whose subtrees are not yet confirmed finished.
    pub unfinished: BTreeSet<Port>,
}

impl Knowledge {
    pub fn is_finished(&self) -> bool {
        self.unfinished.is_empty()
    }
}

/// Child ports some robot has come up through.
///
/// A robot only leaves a child upwards once it saw that child's own subtree
/// finished, so an upward arrival via port `p` confirms subtree `p`.
pub fn finished_child_ports(snapshot: &LogSnapshot) -> BTreeSet<Port> {
    snapshot
        .records()
        .filter(|record| !record.from_parent)
        .filter_map(|record| match record.port {
            EnteredVia::Port(port) => Some(port),
            EnteredVia::Placed => None,
        })
        .collect()
}

/// Child ports in `child_ports` without a finished confirmation in `snapshot`.
pub fn unfinished_child_ports(child_ports: &[Port], snapshot: &LogSnapshot) -> BTreeSet<Port> {
    let finished = finished_child_ports(snapshot);
    child_ports
        .iter()
        .copied()
        .filter(|port| !finished.contains(port))
        .collect()
}
