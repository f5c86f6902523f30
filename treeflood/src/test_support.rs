//! Test-only helpers: tree builders, fake policies and storage, recording observers.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use tempfile::TempDir;

use crate::core::directive::Directive;
use crate::core::knowledge::Knowledge;
use crate::core::policy::{DecisionPolicy, FloodPolicy, PolicyError};
use crate::core::record::{LogSnapshot, Record, RobotId};
use crate::io::storage::{InMemoryStorage, LocalStorage};
use crate::io::tree_store::write_tree;
use crate::observer::{FaultObserver, MoveObserver, Observers};
use crate::robot::{Fault, Robot, World};
use crate::tree::{ArenaTree, NodeId, NodeSpec, Tree};

/// A lone root.
pub fn single() -> NodeSpec {
    NodeSpec::leaf()
}

/// Root with `leaves` leaf children.
pub fn star(leaves: usize) -> NodeSpec {
    NodeSpec::with_children(vec![NodeSpec::leaf(); leaves])
}

/// Root followed by `length` nodes in a line (depth `length`).
pub fn chain(length: usize) -> NodeSpec {
    let mut spec = NodeSpec::leaf();
    for _ in 0..length {
        spec = NodeSpec::with_children(vec![spec]);
    }
    spec
}

/// Tree, storage and world wired together for driving robots by hand.
pub struct Harness {
    pub tree: Arc<ArenaTree>,
    pub storage: Arc<InMemoryStorage>,
    pub world: World,
}

impl Harness {
    pub fn new(spec: &NodeSpec) -> Self {
        Self::with_policy(spec, Arc::new(FloodPolicy))
    }

    pub fn with_policy(spec: &NodeSpec, policy: Arc<dyn DecisionPolicy>) -> Self {
        let tree = Arc::new(ArenaTree::from_spec(spec));
        let storage = Arc::new(InMemoryStorage::new(tree.len()));
        let world = World::new(tree.clone(), storage.clone(), policy);
        Self {
            tree,
            storage,
            world,
        }
    }

    /// Like [`Harness::new`], but robots go through a [`CountingStorage`]
    /// wrapped around `self.storage`.
    pub fn with_counting_storage(spec: &NodeSpec) -> (Self, Arc<CountingStorage>) {
        let mut harness = Self::new(spec);
        let counting = Arc::new(CountingStorage::new(harness.storage.clone()));
        harness.world = World::new(
            harness.tree.clone(),
            counting.clone(),
            Arc::new(FloodPolicy),
        );
        (harness, counting)
    }

    /// A robot placed at the root.
    pub fn robot(&self, id: RobotId, observers: Observers) -> Robot {
        Robot::new(id, self.tree.root(), self.world.clone(), observers)
    }

    pub fn records(&self) -> usize {
        self.storage.record_count().expect("record count")
    }
}

/// Flood policy that fails with `message`, either when deciding or when
/// building knowledge.
pub struct FailingPolicy {
    message: String,
    /// Successful `construct_knowledge` calls before knowledge starts failing.
    /// `None` fails in `decide` instead.
    knowledge_budget: Option<usize>,
    knowledge_calls: AtomicUsize,
}

impl FailingPolicy {
    /// Knowledge works, every decision fails.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            knowledge_budget: None,
            knowledge_calls: AtomicUsize::new(0),
        }
    }

    /// Every knowledge construction fails.
    pub fn in_knowledge(message: &str) -> Self {
        Self::in_knowledge_after(message, 0)
    }

    /// The first `successes` knowledge constructions work, later ones fail.
    pub fn in_knowledge_after(message: &str, successes: usize) -> Self {
        Self {
            knowledge_budget: Some(successes),
            ..Self::new(message)
        }
    }
}

impl DecisionPolicy for FailingPolicy {
    fn construct_knowledge(
        &self,
        round: u64,
        tree: &dyn Tree,
        node: NodeId,
        snapshot: &LogSnapshot,
    ) -> Result<Knowledge, PolicyError> {
        if let Some(budget) = self.knowledge_budget {
            let call = self.knowledge_calls.fetch_add(1, Ordering::SeqCst);
            if call >= budget {
                return Err(PolicyError::Other(self.message.clone()));
            }
        }
        FloodPolicy.construct_knowledge(round, tree, node, snapshot)
    }

    fn decide(
        &self,
        robot: RobotId,
        knowledge: &Knowledge,
        tree: &dyn Tree,
        node: NodeId,
    ) -> Result<Directive, PolicyError> {
        if self.knowledge_budget.is_some() {
            return FloodPolicy.decide(robot, knowledge, tree, node);
        }
        Err(PolicyError::Other(self.message.clone()))
    }
}

/// Flood knowledge with a fixed queue of decisions, then `Stay` forever.
pub struct ScriptedPolicy {
    directives: Mutex<VecDeque<Directive>>,
}

impl ScriptedPolicy {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self {
            directives: Mutex::new(directives.into()),
        }
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn construct_knowledge(
        &self,
        round: u64,
        tree: &dyn Tree,
        node: NodeId,
        snapshot: &LogSnapshot,
    ) -> Result<Knowledge, PolicyError> {
        FloodPolicy.construct_knowledge(round, tree, node, snapshot)
    }

    fn decide(
        &self,
        _robot: RobotId,
        _knowledge: &Knowledge,
        _tree: &dyn Tree,
        _node: NodeId,
    ) -> Result<Directive, PolicyError> {
        let mut directives = self
            .directives
            .lock()
            .map_err(|_| PolicyError::Other("script lock poisoned".to_string()))?;
        Ok(directives.pop_front().unwrap_or(Directive::Stay))
    }
}

/// Collects `(robot, fault message)` pairs.
#[derive(Default)]
pub struct FaultLog {
    entries: Mutex<Vec<(RobotId, String)>>,
}

impl FaultLog {
    pub fn entries(&self) -> Vec<(RobotId, String)> {
        self.entries.lock().expect("fault log").clone()
    }
}

impl FaultObserver for FaultLog {
    fn robot_faulted(&self, robot: &Robot, fault: &Fault) {
        self.entries
            .lock()
            .expect("fault log")
            .push((robot.id(), fault.to_string()));
    }
}

/// Pushes its label into a shared sink on every event.
pub struct OrderProbe {
    label: &'static str,
    sink: Arc<Mutex<Vec<&'static str>>>,
}

impl OrderProbe {
    pub fn new(label: &'static str, sink: Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self { label, sink }
    }
}

impl MoveObserver for OrderProbe {
    fn robot_moved(&self, _robot: &Robot, _from: NodeId, _to: NodeId) {
        self.sink.lock().expect("sink").push(self.label);
    }
}

impl FaultObserver for OrderProbe {
    fn robot_faulted(&self, _robot: &Robot, _fault: &Fault) {
        self.sink.lock().expect("sink").push(self.label);
    }
}

/// Storage wrapper that counts accesses and can be told to fail them.
pub struct CountingStorage {
    inner: Arc<InMemoryStorage>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl CountingStorage {
    pub fn new(inner: Arc<InMemoryStorage>) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// `(reads, writes)` attempted so far, failed ones included.
    pub fn accesses(&self) -> (usize, usize) {
        (
            self.reads.load(Ordering::SeqCst),
            self.writes.load(Ordering::SeqCst),
        )
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl LocalStorage for CountingStorage {
    fn read(&self, node: NodeId) -> Result<LogSnapshot> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("injected read failure at node {node}"));
        }
        self.inner.read(node)
    }

    fn write(&self, record: Record, node: NodeId) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("injected write failure at node {node}"));
        }
        self.inner.write(record, node)
    }
}

/// A tree file inside a temporary directory.
pub struct TempTree {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempTree {
    pub fn new(spec: &NodeSpec) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tree.json");
        write_tree(&path, spec)?;
        Ok(Self { dir, path })
    }
}
