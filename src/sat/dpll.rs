//! Defines the DPLL (Davis-Putnam-Logemann-Loveland) search engine.
//!
//! The search is the textbook recursion without clause learning or
//! heuristics. At every node:
//!
//! 1.  **Timeout check:** if a budget is set and has been exceeded, the whole
//!     search stops with [`Status::Timeout`].
//! 2.  **Unit propagation:** full-scan fixpoint (see [`propagate`]); a falsified
//!     clause makes the node UNSAT.
//! 3.  **Satisfaction check:** if every clause has a true literal the search
//!     stops with [`Status::Sat`].
//! 4.  **Branching:** the lowest unassigned variable is tried `true`, then
//!     `false`. A node with nothing left to branch on is UNSAT.
//!
//! The recursion runs on an explicit stack of choice points, so its depth is
//! bounded by memory rather than by the thread's call stack. Each choice point
//! stores the trail length before its decision; backtracking undoes the trail
//! back to it instead of copying the whole assignment, and visits nodes in
//! exactly the recursive order.

use crate::sat::assignment::Assignment;
use crate::sat::clause_storage::ClauseStore;
use crate::sat::error::SolveError;
use crate::sat::literal::{from_parts, Variable};
use crate::sat::propagation::{all_satisfied, propagate, Propagation};
use crate::sat::solver::{SolveReport, SolverOptions, SolverStats, Status};
use crate::sat::trail::Trail;
use crate::sat::variable_selection::{FixedOrder, VariableSelection};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// An open branch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChoicePoint {
    var: Variable,
    /// Trail length before the decision on `var`.
    mark: usize,
    /// Whether the `false` branch is the one currently explored.
    tried_false: bool,
}

/// A DPLL solver borrowing its clause store.
#[derive(Debug, Clone)]
pub struct Dpll<'a, S: ClauseStore, V: VariableSelection = FixedOrder> {
    store: &'a S,
    options: SolverOptions,
    selector: V,
    stats: SolverStats,
}

impl<'a, S: ClauseStore> Dpll<'a, S> {
    /// A solver with no time limit.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self::with_options(store, SolverOptions::default())
    }

    /// A solver configured by `options`.
    #[must_use]
    pub const fn with_options(store: &'a S, options: SolverOptions) -> Self {
        Self {
            store,
            options,
            selector: FixedOrder,
            stats: SolverStats {
                nodes: 0,
                decisions: 0,
                propagations: 0,
                conflicts: 0,
                max_depth: 0,
            },
        }
    }
}

impl<S: ClauseStore, V: VariableSelection> Dpll<'_, S, V> {
    /// Runs the search from a fully unassigned state.
    ///
    /// On SAT the returned [`Status`] owns the assignment. On UNSAT, TIMEOUT
    /// and ERROR the working assignment is dropped before returning.
    pub fn solve(&mut self) -> SolveReport {
        self.stats = SolverStats::default();
        let start = Instant::now();

        let status = self.search(start).unwrap_or_else(Status::Error);

        let elapsed = start.elapsed();
        debug!(
            status = status.label(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            nodes = self.stats.nodes,
            decisions = self.stats.decisions,
            propagations = self.stats.propagations,
            conflicts = self.stats.conflicts,
            max_depth = self.stats.max_depth,
            "search finished"
        );

        SolveReport {
            status,
            elapsed,
            stats: self.stats,
        }
    }

    /// Counters of the last search.
    #[must_use]
    pub const fn stats(&self) -> SolverStats {
        self.stats
    }

    fn timed_out(&self, start: Instant) -> bool {
        self.options
            .timeout
            .is_some_and(|budget| start.elapsed() > budget)
    }

    fn search(&mut self, start: Instant) -> Result<Status, SolveError> {
        if let Some((clause, literal)) = self.store.first_out_of_range() {
            return Err(SolveError::VariableOutOfRange { clause, literal });
        }

        let num_vars = self.store.num_vars();
        let mut assignment = Assignment::new(num_vars)?;
        let mut trail = Trail::new(num_vars)?;
        let mut stack: Vec<ChoicePoint> = Vec::new();
        stack.try_reserve_exact(num_vars as usize)?;

        loop {
            self.stats.nodes += 1;

            if self.timed_out(start) {
                debug!(depth = stack.len(), "time budget exhausted");
                return Ok(Status::Timeout);
            }

            let consistent = match propagate(self.store, &mut assignment, &mut trail) {
                Propagation::Fixpoint { forced } => {
                    self.stats.propagations += forced;
                    true
                }
                Propagation::Conflict { clause, forced } => {
                    self.stats.propagations += forced;
                    self.stats.conflicts += 1;
                    trace!(clause, depth = stack.len(), "conflict");
                    false
                }
            };

            if consistent {
                if all_satisfied(self.store, &assignment) {
                    return Ok(Status::Sat(assignment));
                }

                if let Some(var) = self.selector.pick(&assignment) {
                    stack.push(ChoicePoint {
                        var,
                        mark: trail.len(),
                        tried_false: false,
                    });
                    self.stats.decisions += 1;
                    self.stats.max_depth = self.stats.max_depth.max(stack.len());
                    trace!(var, depth = stack.len(), "decide true");
                    trail.assign(&mut assignment, from_parts(var, true));
                    continue;
                }
            }

            // This node is UNSAT: return to the nearest choice point whose
            // `false` branch has not been explored yet.
            loop {
                let Some(mut point) = stack.pop() else {
                    return Ok(Status::Unsat);
                };
                trail.undo_to(&mut assignment, point.mark);
                if !point.tried_false {
                    point.tried_false = true;
                    stack.push(point);
                    self.stats.decisions += 1;
                    trace!(var = point.var, depth = stack.len(), "decide false");
                    trail.assign(&mut assignment, from_parts(point.var, false));
                    break;
                }
            }
        }
    }
}

/// Solves `store` with an optional wall-clock budget.
///
/// The budget is checked when a search node is entered, so a single
/// propagation pass is never interrupted; treat it as a soft limit.
pub fn solve<S: ClauseStore>(store: &S, timeout: Option<Duration>) -> SolveReport {
    let options = SolverOptions::default().with_timeout(timeout.unwrap_or(Duration::ZERO));
    Dpll::with_options(store, options).solve()
}
