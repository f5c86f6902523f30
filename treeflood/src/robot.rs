//! Robot state machine for collaborative tree exploration.
//!
//! A robot is pulsed once per tick by its driver. Each pulse executes exactly
//! one `(step, stage)` of the protocol and advances the cursor:
//!
//! - **WRITE** appends a [`Record`] at the current node if the last MOVE
//!   actually moved (or placed) the robot.
//! - **READ** caches the current node's log. The next MOVE only sees this
//!   snapshot.
//! - **MOVE** depends on the step: INITIAL places, NOP stalls, REGULAR asks
//!   the decision policy, UPDATE reports a finished subtree to the parent with
//!   a temporary move, RETURN undoes that temporary move.
//!
//! Robots never talk to each other. The driver must run every robot's MOVE
//! for a generation before any WRITE, and every WRITE before any READ.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::core::cycle::{Cursor, Stage, Step};
use crate::core::directive::{Directive, EnteredVia, Port};
use crate::core::knowledge::Knowledge;
use crate::core::policy::{DecisionPolicy, PolicyError};
use crate::core::record::{LogSnapshot, Record, RobotId, StepNumber};
use crate::io::storage::LocalStorage;
use crate::observer::Observers;
use crate::tree::{NodeId, Tree};

/// Anything that aborts a pulse.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    /// A protocol invariant does not hold at this point of the cycle.
    #[error("unreachable state at {step}/{stage}: {reason}")]
    Unreachable {
        step: Step,
        stage: Stage,
        reason: &'static str,
    },

    #[error("decision policy failed: {0}")]
    Policy(#[from] PolicyError),

    /// The policy broke its contract (unknown child, star away from root, parent at root).
    #[error("illegal directive {directive} at node {node}")]
    IllegalDirective { node: NodeId, directive: Directive },

    #[error("local storage failed: {0:#}")]
    Storage(anyhow::Error),
}

/// Shared collaborators a robot runs against.
#[derive(Clone)]
pub struct World {
    pub tree: Arc<dyn Tree>,
    pub storage: Arc<dyn LocalStorage>,
    pub policy: Arc<dyn DecisionPolicy>,
}

impl World {
    pub fn new(
        tree: Arc<dyn Tree>,
        storage: Arc<dyn LocalStorage>,
        policy: Arc<dyn DecisionPolicy>,
    ) -> Self {
        Self {
            tree,
            storage,
            policy,
        }
    }
}

/// How the robot arrived in the last MOVE stage. `None` on the robot means it stayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Arrival {
    via: EnteredVia,
    from_parent: bool,
}

pub struct Robot {
    id: RobotId,
    location: NodeId,
    cursor: Cursor,
    /// Step to be executed next (1-indexed).
    step_counter: StepNumber,
    /// Round to be executed next.
    round_counter: u64,
    last_arrival: Option<Arrival>,
    snapshot: Option<LogSnapshot>,
    stopped: bool,
    world: World,
    observers: Observers,
}

impl Robot {
    pub fn new(id: RobotId, start: NodeId, world: World, observers: Observers) -> Self {
        Self {
            id,
            location: start,
            cursor: Cursor::START,
            step_counter: 1,
            round_counter: 0,
            last_arrival: None,
            snapshot: None,
            stopped: false,
            world,
            observers,
        }
    }

    pub fn id(&self) -> RobotId {
        self.id
    }

    pub fn location(&self) -> NodeId {
        self.location
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn step_counter(&self) -> StepNumber {
        self.step_counter
    }

    pub fn round_counter(&self) -> u64 {
        self.round_counter
    }

    /// Log snapshot cached by the last READ stage.
    pub fn last_snapshot(&self) -> Option<&LogSnapshot> {
        self.snapshot.as_ref()
    }

    /// Execute one `(step, stage)` and advance. Returns `true` once stopped.
    ///
    /// A stopped robot returns `Ok(true)` without touching anything. On a
    /// fault every fault observer is notified, the cursor stays where it was
    /// and the fault is returned.
    #[instrument(skip_all, fields(robot = self.id, cursor = %self.cursor))]
    pub fn pulse(&mut self) -> Result<bool, Fault> {
        if self.stopped {
            return Ok(true);
        }

        if let Err(fault) = self.execute_stage() {
            warn!(%fault, node = %self.location, "pulse failed");
            self.observers.notify_fault(self, &fault);
            return Err(fault);
        }

        let transition = self.cursor.advance();
        if transition.completes_step {
            self.step_counter += 1;
        }
        if transition.starts_round {
            self.round_counter += 1;
        }
        self.cursor = transition.next;
        Ok(self.stopped)
    }

    fn execute_stage(&mut self) -> Result<(), Fault> {
        match (self.cursor.step, self.cursor.stage) {
            (Step::Nop, _) => Ok(()),
            (_, Stage::Write) => self.write_action(),
            (_, Stage::Read) => self.read_action(),
            (Step::Initial, Stage::Move) => {
                self.last_arrival = Some(Arrival {
                    via: EnteredVia::Placed,
                    from_parent: true,
                });
                Ok(())
            }
            (Step::Regular, Stage::Move) => self.regular_move(),
            (Step::Update, Stage::Move) => self.update_move(),
            (Step::Return, Stage::Move) => self.return_move(),
        }
    }

    fn regular_move(&mut self) -> Result<(), Fault> {
        let tree = Arc::clone(&self.world.tree);
        let knowledge = self.knowledge()?;
        let directive =
            self.world
                .policy
                .decide(self.id, &knowledge, tree.as_ref(), self.location)?;
        debug!(%directive, node = %self.location, round = knowledge.round, "decided");

        match directive {
            Directive::Placed if tree.is_root(self.location) => {
                self.stay();
                self.stopped = true;
                info!(step = self.step_counter, round = self.round_counter, "exploration finished");
                Ok(())
            }
            Directive::Stay => {
                self.stay();
                Ok(())
            }
            Directive::ToParent => self.move_to_parent(tree.as_ref(), &knowledge),
            Directive::ToChild(port) => {
                let child = tree
                    .child(self.location, port)
                    .ok_or(Fault::IllegalDirective {
                        node: self.location,
                        directive,
                    })?;
                self.move_along(EnteredVia::Port(port), child, true);
                Ok(())
            }
            Directive::Placed => Err(Fault::IllegalDirective {
                node: self.location,
                directive,
            }),
        }
    }

    fn update_move(&mut self) -> Result<(), Fault> {
        let tree = Arc::clone(&self.world.tree);
        let knowledge = self.knowledge()?;

        if !knowledge.is_finished() || tree.is_root(self.location) {
            self.stay();
            return Ok(());
        }

        // Temporary move up so the parent learns this subtree is finished.
        self.move_to_parent(tree.as_ref(), &knowledge)
    }

    fn return_move(&mut self) -> Result<(), Fault> {
        let tree = Arc::clone(&self.world.tree);
        let update_step = self.step_counter - 1;
        let temporary = self.cached_snapshot()?.get(update_step, self.id).copied();

        let Some(record) = temporary else {
            self.stay();
            return Ok(());
        };

        let port = record.port.port().ok_or_else(|| self.unreachable("temporary move has no port"))?;
        let child = tree
            .child(self.location, port)
            .ok_or_else(|| self.unreachable("temporary move port is not a child"))?;
        self.move_along(EnteredVia::Port(port), child, true);
        Ok(())
    }

    fn move_to_parent(&mut self, tree: &dyn Tree, knowledge: &Knowledge) -> Result<(), Fault> {
        let parent = tree.parent(self.location).ok_or(Fault::IllegalDirective {
            node: self.location,
            directive: Directive::ToParent,
        })?;
        let port: Port = knowledge
            .parent_port
            .ok_or_else(|| self.unreachable("knowledge has no parent port"))?;
        self.move_along(EnteredVia::Port(port), parent.node, false);
        Ok(())
    }

    fn move_along(&mut self, via: EnteredVia, destination: NodeId, from_parent: bool) {
        let source = self.location;
        self.last_arrival = Some(Arrival { via, from_parent });
        self.location = destination;
        debug!(from = %source, to = %destination, from_parent, "moved");
        self.observers.notify_moved(self, source, destination);
    }

    fn stay(&mut self) {
        self.last_arrival = None;
    }

    fn write_action(&mut self) -> Result<(), Fault> {
        let Some(arrival) = self.last_arrival else {
            return Ok(());
        };
        let record = Record::new(self.step_counter, self.id, arrival.via, arrival.from_parent);
        self.world
            .storage
            .write(record, self.location)
            .map_err(Fault::Storage)?;
        debug!(node = %self.location, step = record.step, "wrote record");
        Ok(())
    }

    fn read_action(&mut self) -> Result<(), Fault> {
        let snapshot = self
            .world
            .storage
            .read(self.location)
            .map_err(Fault::Storage)?;
        debug!(node = %self.location, records = snapshot.len(), "read local storage");
        self.snapshot = Some(snapshot);
        Ok(())
    }

    fn knowledge(&self) -> Result<Knowledge, Fault> {
        let snapshot = self.cached_snapshot()?;
        let knowledge = self.world.policy.construct_knowledge(
            self.round_counter,
            self.world.tree.as_ref(),
            self.location,
            snapshot,
        )?;
        Ok(knowledge)
    }

    fn cached_snapshot(&self) -> Result<&LogSnapshot, Fault> {
        self.snapshot
            .as_ref()
            .ok_or_else(|| self.unreachable("no log snapshot has been read"))
    }

    fn unreachable(&self, reason: &'static str) -> Fault {
        Fault::Unreachable {
            step: self.cursor.step,
            stage: self.cursor.stage,
            reason,
        }
    }
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("id", &self.id)
            .field("location", &self.location)
            .field("cursor", &self.cursor)
            .field("step_counter", &self.step_counter)
            .field("round_counter", &self.round_counter)
            .field("stopped", &self.stopped)
            .finish()
    }
}

impl PartialEq for Robot {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Robot {}

impl PartialOrd for Robot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Robot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::directive::EnteredVia;
    use crate::observer::MoveRecorder;
    use crate::test_support::{
        FailingPolicy, FaultLog, Harness, OrderProbe, ScriptedPolicy, single, star,
    };
    use std::sync::Mutex;

    fn pulse_n(robot: &mut Robot, count: usize) -> bool {
        let mut stopped = false;
        for _ in 0..count {
            stopped = robot.pulse().expect("pulse");
        }
        stopped
    }

    /// Single node, single robot: placed, logged, stalls through NOP, stops in REGULAR.
    #[test]
    fn single_node_robot_places_logs_and_stops() {
        let harness = Harness::new(&single());
        let moves = Arc::new(MoveRecorder::new());
        let mut robot = harness.robot(4, Observers::new().on_move(moves.clone()));

        assert!(!robot.pulse().expect("initial move"));
        assert_eq!(robot.location(), NodeId(0));
        assert_eq!(harness.records(), 0);

        assert!(!robot.pulse().expect("initial write"));
        let log = harness.storage.read(NodeId(0)).expect("read");
        assert_eq!(log.get(1, 4), Some(&Record::new(1, 4, EnteredVia::Placed, true)));

        assert!(!robot.pulse().expect("initial read"));
        assert!(robot.last_snapshot().expect("snapshot").contains(1, 4));
        let after_initial = robot.last_snapshot().cloned();

        assert!(!pulse_n(&mut robot, 3));
        assert_eq!(robot.cursor(), Cursor::new(Step::Regular, Stage::Move));
        assert_eq!(robot.last_snapshot().cloned(), after_initial);
        assert_eq!(harness.records(), 1);

        assert!(robot.pulse().expect("regular move"));
        assert!(robot.is_stopped());
        assert_eq!(robot.location(), NodeId(0));

        assert!(robot.pulse().expect("stopped pulse"));
        assert!(robot.pulse().expect("stopped pulse"));
        assert_eq!(harness.records(), 1);
        assert!(moves.events().is_empty());
    }

    /// Root with one child: down, temporary report up, return, climb back, stop.
    #[test]
    fn single_child_tree_reports_and_returns() {
        let harness = Harness::new(&star(1));
        let moves = Arc::new(MoveRecorder::new());
        let mut robot = harness.robot(0, Observers::new().on_move(moves.clone()));

        assert!(!pulse_n(&mut robot, 6));
        assert_eq!(robot.round_counter(), 1);

        // REGULAR: root -> child via port 0.
        assert!(!pulse_n(&mut robot, 3));
        assert_eq!(robot.location(), NodeId(1));
        let child_log = harness.storage.read(NodeId(1)).expect("read");
        assert_eq!(child_log.get(3, 0), Some(&Record::new(3, 0, EnteredVia::Port(0), true)));

        // UPDATE: leaf is finished, temporary move up.
        assert!(!pulse_n(&mut robot, 3));
        assert_eq!(robot.location(), NodeId(0));
        let root_log = harness.storage.read(NodeId(0)).expect("read");
        assert_eq!(root_log.get(4, 0), Some(&Record::new(4, 0, EnteredVia::Port(0), false)));

        // RETURN: undo the temporary move.
        assert!(!pulse_n(&mut robot, 3));
        assert_eq!(robot.location(), NodeId(1));
        let child_log = harness.storage.read(NodeId(1)).expect("read");
        assert_eq!(child_log.get(5, 0), Some(&Record::new(5, 0, EnteredVia::Port(0), true)));
        assert_eq!(robot.round_counter(), 2);

        // REGULAR at the finished leaf goes up, then UPDATE/RETURN stay at the root.
        assert!(!pulse_n(&mut robot, 9));
        assert_eq!(robot.location(), NodeId(0));
        assert_eq!(robot.cursor(), Cursor::new(Step::Regular, Stage::Move));

        assert!(robot.pulse().expect("final regular move"));
        assert_eq!(robot.step_counter(), 9);
        assert_eq!(robot.round_counter(), 3);

        let hops: Vec<_> = moves.events().iter().map(|event| (event.from, event.to)).collect();
        assert_eq!(
            hops,
            vec![
                (NodeId(0), NodeId(1)),
                (NodeId(1), NodeId(0)),
                (NodeId(0), NodeId(1)),
                (NodeId(1), NodeId(0)),
            ]
        );
        // Placement plus four moves. The stays in steps 7 and 8 left nothing.
        assert_eq!(harness.records(), 5);
    }

    #[test]
    fn step_and_round_counters_follow_the_cycle() {
        let harness = Harness::new(&star(3));
        let mut robot = harness.robot(1, Observers::new());

        let mut previous_round = robot.round_counter();
        for pulse in 0..60u64 {
            let before = robot.cursor();
            assert_eq!(robot.step_counter(), 1 + pulse / 3);
            let stopped = robot.pulse().expect("pulse");
            if stopped {
                break;
            }
            let entered_regular = before.stage == Stage::Read
                && matches!(before.step, Step::Nop | Step::Return);
            let expected_round = previous_round + u64::from(entered_regular);
            assert_eq!(robot.round_counter(), expected_round);
            previous_round = robot.round_counter();
        }
    }

    #[test]
    fn records_carry_writer_id_and_step() {
        let harness = Harness::new(&star(2));
        let mut robot = harness.robot(9, Observers::new());

        loop {
            let writing = robot.cursor().stage == Stage::Write;
            let step = robot.step_counter();
            let before = harness.records();
            if robot.pulse().expect("pulse") {
                break;
            }
            if writing && harness.records() > before {
                let log = harness.storage.read(robot.location()).expect("read");
                let record = log.get(step, 9).expect("record for this step");
                assert_eq!(record.robot, 9);
                assert_eq!(record.step, step);
            }
        }
    }

    #[test]
    fn fault_in_decision_is_reported_and_cursor_kept() {
        let harness = Harness::with_policy(&star(2), Arc::new(FailingPolicy::new("injected")));
        let faults_a = Arc::new(FaultLog::default());
        let faults_b = Arc::new(FaultLog::default());
        let observers = Observers::new()
            .on_fault(faults_a.clone())
            .on_fault(faults_b.clone());
        let mut robot = harness.robot(2, observers);

        assert!(!pulse_n(&mut robot, 6));
        let cursor = robot.cursor();
        let step = robot.step_counter();

        let fault = robot.pulse().unwrap_err();
        assert!(matches!(&fault, Fault::Policy(PolicyError::Other(msg)) if msg == "injected"));
        assert_eq!(faults_a.entries(), vec![(2, fault.to_string())]);
        assert_eq!(faults_b.entries(), vec![(2, fault.to_string())]);
        assert!(!robot.is_stopped());
        assert_eq!(robot.cursor(), cursor);
        assert_eq!(robot.step_counter(), step);
        assert_eq!(robot.location(), NodeId(0));
    }

    #[test]
    fn knowledge_fault_in_regular_is_reported_and_cursor_kept() {
        let policy = FailingPolicy::in_knowledge("no view");
        let harness = Harness::with_policy(&star(2), Arc::new(policy));
        let faults_a = Arc::new(FaultLog::default());
        let faults_b = Arc::new(FaultLog::default());
        let observers = Observers::new()
            .on_fault(faults_a.clone())
            .on_fault(faults_b.clone());
        let mut robot = harness.robot(3, observers);

        assert!(!pulse_n(&mut robot, 6));
        assert_eq!(robot.cursor(), Cursor::new(Step::Regular, Stage::Move));
        let step = robot.step_counter();

        let fault = robot.pulse().unwrap_err();
        assert!(matches!(&fault, Fault::Policy(PolicyError::Other(msg)) if msg == "no view"));
        assert_eq!(faults_a.entries(), vec![(3, fault.to_string())]);
        assert_eq!(faults_b.entries(), vec![(3, fault.to_string())]);
        assert_eq!(robot.cursor(), Cursor::new(Step::Regular, Stage::Move));
        assert_eq!(robot.step_counter(), step);
        assert!(!robot.is_stopped());

        // Pulsing again retries the same stage.
        assert!(robot.pulse().is_err());
        assert_eq!(robot.cursor(), Cursor::new(Step::Regular, Stage::Move));
        assert_eq!(faults_a.entries().len(), 2);
    }

    #[test]
    fn knowledge_fault_in_update_keeps_robot_at_child() {
        // REGULAR builds knowledge once, the UPDATE construction fails.
        let policy = FailingPolicy::in_knowledge_after("update view", 1);
        let harness = Harness::with_policy(&star(1), Arc::new(policy));
        let faults = Arc::new(FaultLog::default());
        let mut robot = harness.robot(0, Observers::new().on_fault(faults.clone()));

        assert!(!pulse_n(&mut robot, 9));
        assert_eq!(robot.cursor(), Cursor::new(Step::Update, Stage::Move));
        assert_eq!(robot.location(), NodeId(1));

        let fault = robot.pulse().unwrap_err();
        assert!(matches!(&fault, Fault::Policy(PolicyError::Other(msg)) if msg == "update view"));
        assert_eq!(faults.entries(), vec![(0, fault.to_string())]);
        assert_eq!(robot.cursor(), Cursor::new(Step::Update, Stage::Move));
        assert_eq!(robot.step_counter(), 4);
        assert_eq!(robot.location(), NodeId(1));
        assert!(!robot.is_stopped());
    }

    #[test]
    fn stopped_robot_never_touches_storage() {
        let (harness, storage) = Harness::with_counting_storage(&single());
        let mut robot = harness.robot(0, Observers::new());

        assert!(!pulse_n(&mut robot, 6));
        assert!(robot.pulse().expect("regular move"));
        let accesses = storage.accesses();
        assert_eq!(accesses.1, 1);

        for _ in 0..10 {
            assert!(robot.pulse().expect("stopped pulse"));
        }
        assert_eq!(storage.accesses(), accesses);
    }

    #[test]
    fn write_failure_becomes_storage_fault() {
        let (harness, storage) = Harness::with_counting_storage(&single());
        let faults = Arc::new(FaultLog::default());
        let mut robot = harness.robot(5, Observers::new().on_fault(faults.clone()));

        assert!(!robot.pulse().expect("initial move"));
        storage.fail_writes(true);
        let fault = robot.pulse().unwrap_err();
        assert!(matches!(fault, Fault::Storage(_)));
        assert!(fault.to_string().contains("injected write failure at node n0"));
        assert_eq!(faults.entries(), vec![(5, fault.to_string())]);
        assert_eq!(robot.cursor(), Cursor::new(Step::Initial, Stage::Write));
        assert_eq!(robot.step_counter(), 1);
        assert_eq!(harness.records(), 0);

        storage.fail_writes(false);
        assert!(!robot.pulse().expect("write retried"));
        assert_eq!(harness.records(), 1);
    }

    #[test]
    fn read_failure_becomes_storage_fault() {
        let (harness, storage) = Harness::with_counting_storage(&single());
        let faults = Arc::new(FaultLog::default());
        let mut robot = harness.robot(1, Observers::new().on_fault(faults.clone()));

        assert!(!pulse_n(&mut robot, 2));
        storage.fail_reads(true);
        let fault = robot.pulse().unwrap_err();
        assert!(matches!(fault, Fault::Storage(_)));
        assert_eq!(faults.entries().len(), 1);
        assert_eq!(robot.cursor(), Cursor::new(Step::Initial, Stage::Read));
        assert!(robot.last_snapshot().is_none());
    }

    #[test]
    fn observers_are_notified_in_registration_order() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::new(OrderProbe::new("first", sink.clone()));
        let second = Arc::new(OrderProbe::new("second", sink.clone()));
        let harness = Harness::new(&star(1));
        let mut robot = harness.robot(
            0,
            Observers::new()
                .on_move(first.clone())
                .on_move(second.clone()),
        );

        pulse_n(&mut robot, 7);
        let seen = sink.lock().expect("sink").clone();
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[test]
    fn unknown_child_port_is_illegal() {
        let policy = ScriptedPolicy::new(vec![Directive::ToChild(5)]);
        let harness = Harness::with_policy(&star(1), Arc::new(policy));
        let mut robot = harness.robot(0, Observers::new());

        pulse_n(&mut robot, 6);
        let fault = robot.pulse().unwrap_err();
        assert!(matches!(
            fault,
            Fault::IllegalDirective {
                node: NodeId(0),
                directive: Directive::ToChild(5)
            }
        ));
    }

    #[test]
    fn parent_directive_at_root_is_illegal() {
        let policy = ScriptedPolicy::new(vec![Directive::ToParent]);
        let harness = Harness::with_policy(&star(1), Arc::new(policy));
        let mut robot = harness.robot(0, Observers::new());

        pulse_n(&mut robot, 6);
        let fault = robot.pulse().unwrap_err();
        assert!(matches!(
            fault,
            Fault::IllegalDirective {
                directive: Directive::ToParent,
                ..
            }
        ));
    }

    #[test]
    fn star_directive_away_from_root_is_illegal_and_does_not_stop() {
        let policy = ScriptedPolicy::new(vec![Directive::ToChild(0), Directive::Placed]);
        let harness = Harness::with_policy(&star(1), Arc::new(policy));
        let mut robot = harness.robot(0, Observers::new());

        // NOP, REGULAR (down), UPDATE (temporary up), RETURN (back down).
        pulse_n(&mut robot, 15);
        assert_eq!(robot.location(), NodeId(1));

        let fault = robot.pulse().unwrap_err();
        assert!(matches!(
            fault,
            Fault::IllegalDirective {
                node: NodeId(1),
                directive: Directive::Placed
            }
        ));
        assert!(!robot.is_stopped());
    }

    #[test]
    fn stay_directive_writes_nothing() {
        let policy = ScriptedPolicy::new(vec![Directive::Stay, Directive::Stay]);
        let harness = Harness::with_policy(&star(2), Arc::new(policy));
        let mut robot = harness.robot(0, Observers::new());

        pulse_n(&mut robot, 6);
        assert_eq!(harness.records(), 1);
        pulse_n(&mut robot, 9);
        assert_eq!(harness.records(), 1);
        assert_eq!(robot.location(), NodeId(0));
    }

    #[test]
    fn robots_order_by_id() {
        let harness = Harness::new(&single());
        let mut robots = vec![
            harness.robot(3, Observers::new()),
            harness.robot(1, Observers::new()),
            harness.robot(2, Observers::new()),
        ];
        robots.sort();
        let ids: Vec<_> = robots.iter().map(Robot::id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
