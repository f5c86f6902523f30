//! Storage and filesystem I/O for the simulator.

pub mod config;
pub mod storage;
pub mod trace_log;
pub mod tree_store;
