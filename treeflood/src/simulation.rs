//! Synchronous driver that pulses a group of robots in lock-step.
//!
//! Every tick pulses each robot exactly once. All robots start at the same
//! cursor, so one tick is one generation of one stage, and the next tick only
//! begins once the current one has finished for every robot. That is the
//! MOVE → WRITE → READ barrier the protocol relies on.

use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::core::policy::{DecisionPolicy, FloodPolicy};
use crate::core::record::RobotId;
use crate::io::config::SimulationConfig;
use crate::io::storage::InMemoryStorage;
use crate::observer::Observers;
use crate::robot::{Fault, Robot, World};
use crate::tree::{ArenaTree, Tree};

/// Why [`Simulation::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationStop {
    /// Every robot stopped at the root.
    Complete,
    /// `max_steps` elapsed with at least one robot still running.
    StepLimit { max_steps: u64 },
}

/// Summary of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub robots: usize,
    pub nodes: usize,
    /// Steps begun by the slowest robot.
    pub steps: u64,
    /// Ticks driven, one stage per tick.
    pub pulses: u64,
    /// Nodes holding at least one record.
    pub visited: usize,
    /// Records written across all nodes.
    pub records: usize,
    pub stop: SimulationStop,
}

#[derive(Debug)]
pub struct Simulation {
    tree: Arc<ArenaTree>,
    storage: Arc<InMemoryStorage>,
    robots: Vec<Robot>,
    parallel: bool,
    max_steps: u64,
    ticks: u64,
}

impl Simulation {
    /// Place `config.robots` robots (ids `0..robots`) at the root using [`FloodPolicy`].
    pub fn new(
        tree: Arc<ArenaTree>,
        config: &SimulationConfig,
        observers: Observers,
    ) -> Result<Self> {
        Self::with_policy(tree, config, Arc::new(FloodPolicy), observers)
    }

    pub fn with_policy(
        tree: Arc<ArenaTree>,
        config: &SimulationConfig,
        policy: Arc<dyn DecisionPolicy>,
        observers: Observers,
    ) -> Result<Self> {
        config.validate()?;
        if tree.is_empty() {
            return Err(anyhow!("cannot explore an empty tree"));
        }
        let storage = Arc::new(InMemoryStorage::new(tree.len()));
        let world = World::new(tree.clone(), storage.clone(), policy);
        let robots = (0..config.robots)
            .map(|id: RobotId| Robot::new(id, tree.root(), world.clone(), observers.clone()))
            .collect();
        Ok(Self {
            tree,
            storage,
            robots,
            parallel: config.parallel,
            max_steps: config.max_steps,
            ticks: 0,
        })
    }

    pub fn tree(&self) -> &ArenaTree {
        &self.tree
    }

    pub fn storage(&self) -> &InMemoryStorage {
        &self.storage
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn all_stopped(&self) -> bool {
        self.robots.iter().all(Robot::is_stopped)
    }

    /// Pulse every robot once. Returns whether all robots have stopped.
    pub fn tick(&mut self) -> Result<bool> {
        if self.parallel {
            self.tick_parallel()?;
        } else {
            for robot in &mut self.robots {
                robot
                    .pulse()
                    .with_context(|| format!("robot {} at {}", robot.id(), robot.location()))?;
            }
        }
        self.ticks += 1;
        Ok(self.all_stopped())
    }

    /// One scoped thread per robot, spawned and joined every tick. The join is
    /// the stage barrier, at the price of `robots` thread spawns per tick.
    fn tick_parallel(&mut self) -> Result<()> {
        let results: Vec<thread::Result<Result<bool, Fault>>> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .robots
                .iter_mut()
                .map(|robot| scope.spawn(move || robot.pulse()))
                .collect();
            handles.into_iter().map(|handle| handle.join()).collect()
        });

        for (robot, joined) in self.robots.iter().zip(results) {
            let outcome = joined.map_err(|_| anyhow!("robot {} panicked", robot.id()))?;
            outcome.with_context(|| format!("robot {} at {}", robot.id(), robot.location()))?;
        }
        Ok(())
    }

    /// Tick until every robot stopped or the step limit is reached.
    ///
    /// Stops immediately on the first fault.
    #[instrument(skip_all, fields(robots = self.robots.len(), nodes = self.tree.len(), parallel = self.parallel))]
    pub fn run(&mut self) -> Result<SimulationReport> {
        let tick_limit = self.max_steps.saturating_mul(3);
        let stop = loop {
            if self.all_stopped() {
                break SimulationStop::Complete;
            }
            if self.ticks >= tick_limit {
                warn!(max_steps = self.max_steps, "step limit reached");
                break SimulationStop::StepLimit {
                    max_steps: self.max_steps,
                };
            }
            self.tick()?;
            if self.ticks % 3 == 0 {
                debug!(
                    step = self.ticks / 3,
                    running = self.robots.iter().filter(|robot| !robot.is_stopped()).count(),
                    "step completed"
                );
            }
        };

        let report = self.report(stop)?;
        info!(steps = report.steps, visited = report.visited, records = report.records, stop = ?report.stop, "simulation finished");
        Ok(report)
    }

    pub fn report(&self, stop: SimulationStop) -> Result<SimulationReport> {
        let logs = self.storage.dump()?;
        Ok(SimulationReport {
            robots: self.robots.len(),
            nodes: self.tree.len(),
            steps: self.ticks.div_ceil(3),
            pulses: self.ticks,
            visited: logs.iter().filter(|(_, log)| !log.is_empty()).count(),
            records: logs.iter().map(|(_, log)| log.len()).sum(),
            stop,
        })
    }
}
