//! The step/stage cycle every robot runs through.
//!
//! A step is one `MOVE, WRITE, READ` triple. When the READ stage of a step
//! completes the robot advances to the next step according to
//! [`Cursor::advance`]:
//!
//! ```text
//! INITIAL -> NOP -> REGULAR -> UPDATE -> RETURN -> REGULAR -> ...
//!                ^ round+1                      ^ round+1
//! ```

use std::fmt;

use serde::Serialize;

/// Phase of the exploration protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Initial,
    Nop,
    Regular,
    Update,
    Return,
}

/// Sub-stage within a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Move,
    Write,
    Read,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Initial => "INITIAL",
            Step::Nop => "NOP",
            Step::Regular => "REGULAR",
            Step::Update => "UPDATE",
            Step::Return => "RETURN",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Move => "MOVE",
            Stage::Write => "WRITE",
            Stage::Read => "READ",
        };
        f.write_str(name)
    }
}

/// Position of a robot in the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cursor {
    pub step: Step,
    pub stage: Stage,
}

/// Result of advancing a [`Cursor`] by one pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Cursor,
    /// The step counter increments (a READ stage just completed).
    pub completes_step: bool,
    /// The round counter increments (entering REGULAR).
    pub starts_round: bool,
}

impl Cursor {
    pub const START: Cursor = Cursor {
        step: Step::Initial,
        stage: Stage::Move,
    };

    pub fn new(step: Step, stage: Stage) -> Self {
        Self { step, stage }
    }

    /// The full transition table, one entry per `(step, stage)` pair.
    pub fn advance(self) -> Transition {
        let (next, completes_step, starts_round) = match (self.step, self.stage) {
            (step, Stage::Move) => (Cursor::new(step, Stage::Write), false, false),
            (step, Stage::Write) => (Cursor::new(step, Stage::Read), false, false),
            (Step::Initial, Stage::Read) => (Cursor::new(Step::Nop, Stage::Move), true, false),
            (Step::Nop, Stage::Read) => (Cursor::new(Step::Regular, Stage::Move), true, true),
            (Step::Regular, Stage::Read) => (Cursor::new(Step::Update, Stage::Move), true, false),
            (Step::Update, Stage::Read) => (Cursor::new(Step::Return, Stage::Move), true, false),
            (Step::Return, Stage::Read) => (Cursor::new(Step::Regular, Stage::Move), true, true),
        };
        Transition {
            next,
            completes_step,
            starts_round,
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.step, self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_cycle_move_write_read() {
        let mut cursor = Cursor::START;
        let mut stages = Vec::new();
        for _ in 0..9 {
            stages.push(cursor.stage);
            cursor = cursor.advance().next;
        }
        assert_eq!(
            stages,
            vec![
                Stage::Move,
                Stage::Write,
                Stage::Read,
                Stage::Move,
                Stage::Write,
                Stage::Read,
                Stage::Move,
                Stage::Write,
                Stage::Read,
            ]
        );
    }

    #[test]
    fn steps_follow_protocol_order() {
        let mut cursor = Cursor::START;
        let mut steps = vec![cursor.step];
        for _ in 0..(3 * 7) {
            let transition = cursor.advance();
            if transition.completes_step {
                steps.push(transition.next.step);
            }
            cursor = transition.next;
        }
        assert_eq!(
            steps,
            vec![
                Step::Initial,
                Step::Nop,
                Step::Regular,
                Step::Update,
                Step::Return,
                Step::Regular,
                Step::Update,
                Step::Return,
            ]
        );
    }

    #[test]
    fn round_starts_only_when_entering_regular() {
        for step in [Step::Initial, Step::Nop, Step::Regular, Step::Update, Step::Return] {
            for stage in [Stage::Move, Stage::Write, Stage::Read] {
                let transition = Cursor::new(step, stage).advance();
                let expected = stage == Stage::Read && matches!(step, Step::Nop | Step::Return);
                assert_eq!(transition.starts_round, expected, "{step}/{stage}");
                assert_eq!(transition.completes_step, stage == Stage::Read);
            }
        }
    }
}
