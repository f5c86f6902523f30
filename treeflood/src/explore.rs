//! Orchestration for `treeflood run`: load, simulate, optionally trace.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::io::config::SimulationConfig;
use crate::io::trace_log::{TracePaths, TraceWriteRequest, write_trace};
use crate::io::tree_store::load_tree;
use crate::observer::{MoveRecorder, Observers, TracingObserver};
use crate::simulation::{Simulation, SimulationReport};

/// Inputs for one exploration run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub tree_path: PathBuf,
    pub config: SimulationConfig,
    /// Write `meta.json`, `moves.json` and `storage.json` here when set.
    pub trace_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: SimulationReport,
    pub trace: Option<TracePaths>,
}

/// Load the tree at `options.tree_path` and explore it.
pub fn run_tree(options: &RunOptions) -> Result<RunOutcome> {
    let tree = load_tree(&options.tree_path).context("load tree for exploration")?;
    let moves = Arc::new(MoveRecorder::new());
    let observers = Observers::new()
        .on_move(Arc::new(TracingObserver))
        .on_move(moves.clone())
        .on_fault(Arc::new(TracingObserver));

    let mut simulation = Simulation::new(Arc::new(tree), &options.config, observers)?;
    let report = simulation.run()?;

    let trace = match &options.trace_dir {
        Some(dir) => Some(trace_run(dir, &report, &simulation, &moves)?),
        None => None,
    };

    Ok(RunOutcome { report, trace })
}

fn trace_run(
    dir: &Path,
    report: &SimulationReport,
    simulation: &Simulation,
    moves: &MoveRecorder,
) -> Result<TracePaths> {
    let logs = simulation.storage().dump()?;
    let events = moves.events();
    let paths = write_trace(&TraceWriteRequest {
        dir,
        report,
        moves: &events,
        logs: &logs,
    })
    .with_context(|| format!("write trace to {}", dir.display()))?;
    info!(dir = %paths.dir.display(), moves = events.len(), "trace written");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationStop;
    use crate::test_support::{TempTree, star};

    #[test]
    fn runs_tree_file_and_writes_trace() {
        let tree = TempTree::new(&star(2)).expect("tree file");
        let trace_dir = tree.dir.path().join("trace");
        let outcome = run_tree(&RunOptions {
            tree_path: tree.path.clone(),
            config: SimulationConfig::default(),
            trace_dir: Some(trace_dir.clone()),
        })
        .expect("run");

        assert_eq!(outcome.report.stop, SimulationStop::Complete);
        assert_eq!(outcome.report.visited, 3);
        let trace = outcome.trace.expect("trace paths");
        assert_eq!(trace.dir, trace_dir);
        assert!(trace.meta_path.exists());
        assert!(trace.moves_path.exists());
        assert!(trace.storage_path.exists());
    }

    #[test]
    fn missing_tree_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = run_tree(&RunOptions {
            tree_path: temp.path().join("absent.json"),
            config: SimulationConfig::default(),
            trace_dir: None,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("load tree for exploration"));
    }
}
