//! Node-local storage: the only channel robots communicate through.
//!
//! The [`LocalStorage`] trait decouples the robot from the storage engine.
//! [`InMemoryStorage`] keeps one mutex per node, so concurrent robots on
//! different nodes never contend and accesses to one node are serialized.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use tracing::trace;

use crate::core::record::{LogSnapshot, Record};
use crate::tree::NodeId;

/// Append-only per-node log keyed by `(step, robot)`.
pub trait LocalStorage: Send + Sync {
    /// Everything currently visible at `node`.
    fn read(&self, node: NodeId) -> Result<LogSnapshot>;

    /// Insert `record` at `node`. Writing an existing key is an error.
    fn write(&self, record: Record, node: NodeId) -> Result<()>;
}

/// Storage held entirely in memory, one log per node.
#[derive(Debug)]
pub struct InMemoryStorage {
    logs: Vec<Mutex<LogSnapshot>>,
}

impl InMemoryStorage {
    pub fn new(node_count: usize) -> Self {
        Self {
            logs: (0..node_count)
                .map(|_| Mutex::new(LogSnapshot::new()))
                .collect(),
        }
    }

    fn log(&self, node: NodeId) -> Result<MutexGuard<'_, LogSnapshot>> {
        let slot = self
            .logs
            .get(node.0)
            .ok_or_else(|| anyhow!("no local storage for node {}", node))?;
        slot.lock()
            .map_err(|_| anyhow!("local storage lock poisoned at node {}", node))
    }

    /// Snapshot of every node in node order.
    pub fn dump(&self) -> Result<Vec<(NodeId, LogSnapshot)>> {
        (0..self.logs.len())
            .map(|index| -> Result<(NodeId, LogSnapshot)> {
                let node = NodeId(index);
                Ok((node, self.log(node)?.clone()))
            })
            .collect()
    }

    /// Total number of records across all nodes.
    pub fn record_count(&self) -> Result<usize> {
        let mut total = 0;
        for index in 0..self.logs.len() {
            total += self.log(NodeId(index))?.len();
        }
        Ok(total)
    }
}

impl LocalStorage for InMemoryStorage {
    fn read(&self, node: NodeId) -> Result<LogSnapshot> {
        let log = self.log(node)?;
        trace!(%node, records = log.len(), "read local storage");
        Ok(log.clone())
    }

    fn write(&self, record: Record, node: NodeId) -> Result<()> {
        let mut log = self.log(node)?;
        if !log.insert(record) {
            return Err(anyhow!(
                "record for step {} robot {} already written at node {}",
                record.step,
                record.robot,
                node
            ));
        }
        trace!(%node, step = record.step, robot = record.robot, "wrote local storage");
        Ok(())
    }
}
