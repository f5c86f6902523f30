//! Decision policy: turns knowledge into a movement directive.
//!
//! The robot state machine only depends on [`DecisionPolicy`]. Both methods
//! must be deterministic in their arguments so simulations are reproducible.

use crate::core::directive::Directive;
use crate::core::knowledge::{Knowledge, unfinished_child_ports};
use crate::core::record::{LogSnapshot, RobotId};
use crate::tree::{NodeId, Tree};

/// Failure raised while constructing knowledge or deciding.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("node {0} is not part of the tree")]
    UnknownNode(NodeId),

    #[error("{0}")]
    Other(String),
}

/// Knowledge construction plus port selection.
pub trait DecisionPolicy: Send + Sync {
    fn construct_knowledge(
        &self,
        round: u64,
        tree: &dyn Tree,
        node: NodeId,
        snapshot: &LogSnapshot,
    ) -> Result<Knowledge, PolicyError>;

    /// Must never name a child port that does not exist at `node`, and must
    /// only return [`Directive::Placed`] at the root.
    fn decide(
        &self,
        robot: RobotId,
        knowledge: &Knowledge,
        tree: &dyn Tree,
        node: NodeId,
    ) -> Result<Directive, PolicyError>;
}

/// Depth-first flooding: go down into an unfinished child, go up once every
/// child is finished, terminate at a finished root.
///
/// Robots at the same node spread over the unfinished children by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloodPolicy;

impl DecisionPolicy for FloodPolicy {
    fn construct_knowledge(
        &self,
        round: u64,
        tree: &dyn Tree,
        node: NodeId,
        snapshot: &LogSnapshot,
    ) -> Result<Knowledge, PolicyError> {
        if node.0 >= tree.len() {
            return Err(PolicyError::UnknownNode(node));
        }
        Ok(Knowledge {
            round,
            parent_port: tree.parent(node).map(|edge| edge.port),
            unfinished: unfinished_child_ports(&tree.child_ports(node), snapshot),
        })
    }

    fn decide(
        &self,
        robot: RobotId,
        knowledge: &Knowledge,
        tree: &dyn Tree,
        node: NodeId,
    ) -> Result<Directive, PolicyError> {
        if !knowledge.unfinished.is_empty() {
            let index = robot as usize % knowledge.unfinished.len();
            // index < len, so nth always yields a port
            if let Some(port) = knowledge.unfinished.iter().nth(index) {
                return Ok(Directive::ToChild(*port));
            }
        }
        if tree.is_root(node) {
            return Ok(Directive::Placed);
        }
        Ok(Directive::ToParent)
    }
}
