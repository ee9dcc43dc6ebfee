//! Strongly-typed step identifier.

use std::fmt;

/// Index of an output step in a simulation run.
///
/// Output steps are a subset of the internal integration steps: a run
/// with `dt = 5 s` and an output interval of 60 s records steps
/// `0, 12, 24, ...`. Step 0 is special for scalar series, where it starts
/// a fresh sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Step(pub u64);

impl Step {
    /// The first step of a run.
    pub const ZERO: Step = Step(0);

    /// Whether this is the first step of a run.
    pub fn is_first(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for Step {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<Step> for u64 {
    fn from(s: Step) -> Self {
        s.0
    }
}
