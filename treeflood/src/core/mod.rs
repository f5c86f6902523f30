//! Deterministic, pure protocol logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod cycle;
pub mod directive;
pub mod invariants;
pub mod knowledge;
pub mod policy;
pub mod record;
