//! Trace artifacts for a finished run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::record::{LogSnapshot, Record};
use crate::observer::MoveEvent;
use crate::simulation::SimulationReport;
use crate::tree::NodeId;

#[derive(Debug, Clone)]
pub struct TracePaths {
    pub dir: PathBuf,
    pub meta_path: PathBuf,
    pub moves_path: PathBuf,
    pub storage_path: PathBuf,
}

impl TracePaths {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            meta_path: dir.join("meta.json"),
            moves_path: dir.join("moves.json"),
            storage_path: dir.join("storage.json"),
        }
    }
}

/// One node's log as written to `storage.json`.
#[derive(Debug, Serialize)]
struct NodeLog<'a> {
    node: NodeId,
    records: Vec<&'a Record>,
}

pub struct TraceWriteRequest<'a> {
    pub dir: &'a Path,
    pub report: &'a SimulationReport,
    pub moves: &'a [MoveEvent],
    pub logs: &'a [(NodeId, LogSnapshot)],
}

pub fn write_trace(request: &TraceWriteRequest<'_>) -> Result<TracePaths> {
    let paths = TracePaths::new(request.dir);
    fs::create_dir_all(&paths.dir)
        .with_context(|| format!("create trace dir {}", paths.dir.display()))?;

    // Parallel runs notify in arbitrary order; a robot moves at most once per step.
    let mut moves = request.moves.to_vec();
    moves.sort_by_key(|event| (event.step, event.robot));

    let logs: Vec<NodeLog<'_>> = request
        .logs
        .iter()
        .map(|(node, log)| NodeLog {
            node: *node,
            records: log.records().collect(),
        })
        .collect();

    write_json(&paths.meta_path, request.report)?;
    write_json(&paths.moves_path, &moves)?;
    write_json(&paths.storage_path, &logs)?;

    Ok(paths)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(value)?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::directive::EnteredVia;
    use crate::simulation::SimulationStop;

    fn report() -> SimulationReport {
        SimulationReport {
            robots: 2,
            nodes: 2,
            steps: 9,
            pulses: 25,
            visited: 2,
            records: 3,
            stop: SimulationStop::Complete,
        }
    }

    #[test]
    fn trace_paths_are_stable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = TracePaths::new(temp.path());
        assert!(paths.meta_path.ends_with("meta.json"));
        assert!(paths.moves_path.ends_with("moves.json"));
        assert!(paths.storage_path.ends_with("storage.json"));
    }

    #[test]
    fn writes_sorted_moves_and_sentinel_ports() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("trace");
        let moves = vec![
            MoveEvent {
                step: 4,
                robot: 1,
                from: NodeId(1),
                to: NodeId(0),
            },
            MoveEvent {
                step: 3,
                robot: 0,
                from: NodeId(0),
                to: NodeId(1),
            },
        ];
        let root_log: LogSnapshot = [
            Record::new(1, 0, EnteredVia::Placed, true),
            Record::new(4, 1, EnteredVia::Port(0), false),
        ]
        .into_iter()
        .collect();
        let child_log: LogSnapshot = [Record::new(3, 0, EnteredVia::Port(0), true)]
            .into_iter()
            .collect();
        let logs = vec![(NodeId(0), root_log), (NodeId(1), child_log)];

        let paths = write_trace(&TraceWriteRequest {
            dir: &dir,
            report: &report(),
            moves: &moves,
            logs: &logs,
        })
        .expect("write trace");

        let meta: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.meta_path).expect("meta"))
                .expect("meta json");
        assert_eq!(meta["steps"], 9);
        assert_eq!(meta["stop"]["kind"], "complete");

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.moves_path).expect("moves"))
                .expect("moves json");
        assert_eq!(written[0]["step"], 3);
        assert_eq!(written[1]["step"], 4);

        let storage = fs::read_to_string(&paths.storage_path).expect("storage");
        assert!(storage.ends_with('\n'));
        let storage: serde_json::Value = serde_json::from_str(&storage).expect("storage json");
        assert_eq!(storage[0]["node"], 0);
        assert_eq!(storage[0]["records"][0]["port"], -1);
        assert_eq!(storage[0]["records"][1]["port"], 0);
        assert_eq!(storage[1]["records"][0]["from_parent"], true);
    }
}
