//! Movement directives and their reserved integer encoding.
//!
//! Ports are plain non-negative indices. The control values a decision policy
//! can return live in [`Directive`], so they can never collide with a real
//! port. The reserved integers survive only in the record encoding used by
//! trace files, see [`EnteredVia`]: `-1` marks a placement, while `-2` and
//! `-3` name directives that never produce a record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of an edge from a node to one of its children.
pub type Port = usize;

/// Wire value for "placed here without using a port" (also: terminate at root).
pub const STAR_PORT: i64 = -1;
/// Wire value for "move to the parent".
pub const PARENT_PORT: i64 = -2;
/// Wire value for "do not move this step".
pub const STAY_PORT: i64 = -3;

/// Movement decision for a single MOVE stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Move up along the parent edge.
    ToParent,
    /// No port used. At the root this signals that exploration is complete.
    Placed,
    /// Do not move.
    Stay,
    /// Move down along the given child port.
    ToChild(Port),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::ToParent => write!(f, "parent"),
            Directive::Placed => write!(f, "star"),
            Directive::Stay => write!(f, "stay"),
            Directive::ToChild(port) => write!(f, "child {port}"),
        }
    }
}

/// Port through which a robot entered a node, as stored in a record.
///
/// Has no "stay" variant: a record only exists for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum EnteredVia {
    /// Initial placement, no port used.
    Placed,
    /// A real port. For upward moves this is the parent's port leading to the child left.
    Port(Port),
}

impl EnteredVia {
    pub fn port(self) -> Option<Port> {
        match self {
            EnteredVia::Placed => None,
            EnteredVia::Port(port) => Some(port),
        }
    }
}

impl From<EnteredVia> for i64 {
    fn from(value: EnteredVia) -> Self {
        match value {
            EnteredVia::Placed => STAR_PORT,
            EnteredVia::Port(port) => port as i64,
        }
    }
}

impl TryFrom<i64> for EnteredVia {
    type Error = WireError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            STAR_PORT => Ok(EnteredVia::Placed),
            PARENT_PORT | STAY_PORT => Err(WireError::NotAnArrival(value)),
            port if port >= 0 => Ok(EnteredVia::Port(port as Port)),
            other => Err(WireError::Invalid(other)),
        }
    }
}

/// A negative record port that does not decode to an [`EnteredVia`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Parent or stay sentinel: a record is only written for an arrival.
    #[error("sentinel {0} never appears in a record")]
    NotAnArrival(i64),

    #[error("invalid port value {0}")]
    Invalid(i64),
}
