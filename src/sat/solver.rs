//! Outcome, statistics and option types for the search engine.

use crate::sat::assignment::Assignment;
use crate::sat::error::SolveError;
use std::fmt;
use std::time::Duration;

/// The four possible results of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Satisfiable; the caller now owns the satisfying assignment.
    Sat(Assignment),
    /// No assignment satisfies the store.
    Unsat,
    /// The time budget ran out. No partial result is kept.
    Timeout,
    /// The search could not be carried out.
    Error(SolveError),
}

impl Status {
    /// Status code used in result files: `1` SAT, `0` UNSAT, `-1` otherwise.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Sat(_) => 1,
            Self::Unsat => 0,
            Self::Timeout | Self::Error(_) => -1,
        }
    }

    /// `true` for [`Status::Sat`].
    #[must_use]
    pub const fn is_sat(&self) -> bool {
        matches!(self, Self::Sat(_))
    }

    /// The satisfying assignment, if SAT.
    #[must_use]
    pub const fn model(&self) -> Option<&Assignment> {
        match self {
            Self::Sat(a) => Some(a),
            _ => None,
        }
    }

    /// Takes the assignment out of a SAT status.
    #[must_use]
    pub fn into_model(self) -> Option<Assignment> {
        match self {
            Self::Sat(a) => Some(a),
            _ => None,
        }
    }

    /// Upper-case name used in console output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sat(_) => "SAT",
            Self::Unsat => "UNSAT",
            Self::Timeout => "TIMEOUT",
            Self::Error(_) => "ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverStats {
    /// Search nodes entered (the root plus one per branch tried).
    pub nodes: usize,
    /// Branches taken, both polarities counted.
    pub decisions: usize,
    /// Assignments forced by unit propagation.
    pub propagations: usize,
    /// Falsified clauses met by propagation.
    pub conflicts: usize,
    /// Deepest stack of open choice points.
    pub max_depth: usize,
}

/// The status of a solve together with how long it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    /// How the search ended.
    pub status: Status,
    /// Wall-clock time of the search.
    pub elapsed: Duration,
    /// Search counters.
    pub stats: SolverStats,
}

impl SolveReport {
    /// Elapsed time in milliseconds, as a float.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Search options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverOptions {
    /// Wall-clock budget. `None` means no limit.
    pub timeout: Option<Duration>,
}

impl SolverOptions {
    /// Sets the budget; a zero duration means no limit.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Sets the budget from milliseconds; `0` means no limit.
    #[must_use]
    pub fn with_timeout_ms(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }
}
