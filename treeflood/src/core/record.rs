//! Visit records and per-node log snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::directive::EnteredVia;

/// Unique robot identifier.
pub type RobotId = u32;

/// Step counter value (1-indexed).
pub type StepNumber = u64;

/// Immutable entry stating that `robot` entered a node during `step` via `port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub step: StepNumber,
    pub robot: RobotId,
    pub port: EnteredVia,
    /// `true` for a parent-to-child arrival, `false` for child-to-parent.
    pub from_parent: bool,
}

impl Record {
    pub fn new(step: StepNumber, robot: RobotId, port: EnteredVia, from_parent: bool) -> Self {
        Self {
            step,
            robot,
            port,
            from_parent,
        }
    }

    pub fn key(&self) -> (StepNumber, RobotId) {
        (self.step, self.robot)
    }
}

/// Copy of a node's log at the moment it was read, keyed by `(step, robot)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSnapshot {
    records: BTreeMap<(StepNumber, RobotId), Record>,
}

impl LogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, step: StepNumber, robot: RobotId) -> Option<&Record> {
        self.records.get(&(step, robot))
    }

    pub fn contains(&self, step: StepNumber, robot: RobotId) -> bool {
        self.records.contains_key(&(step, robot))
    }

    /// Insert a record. Returns `false` (and keeps the old entry) if the key exists.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.records.contains_key(&record.key()) {
            return false;
        }
        self.records.insert(record.key(), record);
        true
    }

    /// Records in ascending `(step, robot)` order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if every record of `earlier` is present here unchanged.
    pub fn is_superset_of(&self, earlier: &LogSnapshot) -> bool {
        earlier
            .records
            .iter()
            .all(|(key, record)| self.records.get(key) == Some(record))
    }
}

impl FromIterator<Record> for LogSnapshot {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut snapshot = LogSnapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_never_overwrites_existing_key() {
        let mut snapshot = LogSnapshot::new();
        assert!(snapshot.insert(Record::new(1, 7, EnteredVia::Placed, true)));
        assert!(!snapshot.insert(Record::new(1, 7, EnteredVia::Port(3), false)));

        let kept = snapshot.get(1, 7).expect("record");
        assert_eq!(kept.port, EnteredVia::Placed);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn records_iterate_in_step_then_robot_order() {
        let snapshot: LogSnapshot = [
            Record::new(4, 1, EnteredVia::Port(0), false),
            Record::new(1, 2, EnteredVia::Placed, true),
            Record::new(1, 0, EnteredVia::Placed, true),
        ]
        .into_iter()
        .collect();

        let keys: Vec<_> = snapshot.records().map(Record::key).collect();
        assert_eq!(keys, vec![(1, 0), (1, 2), (4, 1)]);
    }

    #[test]
    fn superset_check_detects_missing_records() {
        let earlier: LogSnapshot = [Record::new(1, 0, EnteredVia::Placed, true)]
            .into_iter()
            .collect();
        let mut later = earlier.clone();
        later.insert(Record::new(3, 0, EnteredVia::Port(1), true));

        assert!(later.is_superset_of(&earlier));
        assert!(!earlier.is_superset_of(&later));
    }

    #[test]
    fn record_serializes_port_with_sentinel() {
        let record = Record::new(1, 0, EnteredVia::Placed, true);
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"step":1,"robot":0,"port":-1,"from_parent":true}"#);
    }
}
