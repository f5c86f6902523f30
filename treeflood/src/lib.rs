//! Synchronous collaborative tree exploration.
//!
//! A group of robots starts at the root of an unknown tree. Robots never talk
//! to each other directly: they leave [`core::record::Record`]s in per-node
//! local storage and decide where to go from what they read there. Each robot
//! runs a five-step cycle (INITIAL, NOP, REGULAR, UPDATE, RETURN), every step
//! split into MOVE, WRITE and READ stages.
//!
//! - **[`core`]**: Pure protocol pieces (cycle table, directives, records,
//!   knowledge, decision policy, tree invariants). No I/O.
//! - **[`io`]**: Local storage, config, tree files and trace artifacts.
//!
//! [`robot`] implements the state machine, [`simulation`] drives a group of
//! robots with the MOVE → WRITE → READ barrier, and [`explore`] wires both
//! to the CLI.

pub mod core;
pub mod exit_codes;
pub mod explore;
pub mod generate;
pub mod io;
pub mod logging;
pub mod observer;
pub mod robot;
pub mod simulation;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tree;
