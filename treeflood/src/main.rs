//! Collaborative tree exploration simulator.
//!
//! Robots start at the root of a tree, communicate only through per-node
//! logs, and flood the tree until every robot is back at the root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use treeflood::exit_codes;
use treeflood::explore::{RunOptions, run_tree};
use treeflood::generate::random_tree;
use treeflood::io::config::{CONFIG_FILE, SimulationConfig, load_config, write_config};
use treeflood::io::tree_store::write_tree;
use treeflood::logging;
use treeflood::simulation::SimulationStop;

#[derive(Parser)]
#[command(
    name = "treeflood",
    version,
    about = "Synchronous multi-robot tree exploration simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `treeflood.toml` in the current directory.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Write a random tree file.
    Generate {
        /// Number of nodes, root included.
        #[arg(long)]
        nodes: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Explore a tree file until every robot is back at the root.
    Run {
        tree: PathBuf,
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,
        /// Override `robots` from the config.
        #[arg(long)]
        robots: Option<u32>,
        /// Pulse robots on scoped threads.
        #[arg(long)]
        parallel: bool,
        /// Directory for trace artifacts.
        #[arg(long)]
        trace: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(Path::new(CONFIG_FILE), force),
        Command::Generate { nodes, seed, out } => cmd_generate(nodes, seed, &out),
        Command::Run {
            tree,
            config,
            robots,
            parallel,
            trace,
        } => {
            let mut cfg = load_config(&config)?;
            if let Some(robots) = robots {
                cfg.robots = robots;
            }
            cfg.parallel |= parallel;
            cmd_run(tree, cfg, trace)
        }
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        println!("{} already exists", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &SimulationConfig::default())?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_generate(nodes: usize, seed: u64, out: &Path) -> Result<i32> {
    let spec = random_tree(nodes, seed)?;
    write_tree(out, &spec).context("write generated tree")?;
    println!("wrote {} nodes to {}", spec.count(), out.display());
    Ok(exit_codes::OK)
}

fn cmd_run(tree_path: PathBuf, config: SimulationConfig, trace_dir: Option<PathBuf>) -> Result<i32> {
    let outcome = run_tree(&RunOptions {
        tree_path,
        config,
        trace_dir,
    })?;
    let report = &outcome.report;
    match report.stop {
        SimulationStop::Complete => {
            println!(
                "complete: {} robots explored {}/{} nodes in {} steps",
                report.robots, report.visited, report.nodes, report.steps
            );
            Ok(exit_codes::OK)
        }
        SimulationStop::StepLimit { max_steps } => {
            println!(
                "incomplete: step limit {} reached, {}/{} nodes visited",
                max_steps, report.visited, report.nodes
            );
            Ok(exit_codes::INCOMPLETE)
        }
    }
}
