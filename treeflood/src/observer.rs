//! Move and fault observers.
//!
//! Observers are notified synchronously from inside [`Robot::pulse`], in the
//! order they were registered, before the pulse returns.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, error};

use crate::core::record::{RobotId, StepNumber};
use crate::robot::{Fault, Robot};
use crate::tree::NodeId;

/// Receives an event every time a robot changes its node.
pub trait MoveObserver: Send + Sync {
    fn robot_moved(&self, robot: &Robot, from: NodeId, to: NodeId);
}

/// Receives every fault a robot raises from `pulse`, before it is returned.
pub trait FaultObserver: Send + Sync {
    fn robot_faulted(&self, robot: &Robot, fault: &Fault);
}

/// Ordered observer registries shared by a group of robots.
#[derive(Clone, Default)]
pub struct Observers {
    moved: Vec<Arc<dyn MoveObserver>>,
    faulted: Vec<Arc<dyn FaultObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_move(mut self, observer: Arc<dyn MoveObserver>) -> Self {
        self.moved.push(observer);
        self
    }

    pub fn on_fault(mut self, observer: Arc<dyn FaultObserver>) -> Self {
        self.faulted.push(observer);
        self
    }

    pub(crate) fn notify_moved(&self, robot: &Robot, from: NodeId, to: NodeId) {
        for observer in &self.moved {
            observer.robot_moved(robot, from, to);
        }
    }

    pub(crate) fn notify_fault(&self, robot: &Robot, fault: &Fault) {
        for observer in &self.faulted {
            observer.robot_faulted(robot, fault);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("moved", &self.moved.len())
            .field("faulted", &self.faulted.len())
            .finish()
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MoveObserver for TracingObserver {
    fn robot_moved(&self, robot: &Robot, from: NodeId, to: NodeId) {
        debug!(robot = robot.id(), step = robot.step_counter(), %from, %to, "robot moved");
    }
}

impl FaultObserver for TracingObserver {
    fn robot_faulted(&self, robot: &Robot, fault: &Fault) {
        error!(robot = robot.id(), cursor = %robot.cursor(), %fault, "robot faulted");
    }
}

/// A single recorded move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveEvent {
    pub step: StepNumber,
    pub robot: RobotId,
    pub from: NodeId,
    pub to: NodeId,
}

/// Collects every move in notification order.
#[derive(Debug, Default)]
pub struct MoveRecorder {
    events: Mutex<Vec<MoveEvent>>,
}

impl MoveRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MoveEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// `start` plus every node some robot moved into.
    pub fn visited(&self, start: NodeId) -> BTreeSet<NodeId> {
        let mut visited = BTreeSet::from([start]);
        visited.extend(self.events().iter().map(|event| event.to));
        visited
    }
}

impl MoveObserver for MoveRecorder {
    fn robot_moved(&self, robot: &Robot, from: NodeId, to: NodeId) {
        if let Ok(mut events) = self.events.lock() {
            events.push(MoveEvent {
                step: robot.step_counter(),
                robot: robot.id(),
                from,
                to,
            });
        }
    }
}
