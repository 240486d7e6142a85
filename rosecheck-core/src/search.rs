//! Shrink search over a failing test case's decision tree.
//!
//! The search walks the tree in pre-order. For each node it substitutes the
//! candidates of the node's generator one at a time and replays the case.
//! The first candidate that still fails is kept and the walk restarts from
//! the root of the updated tree; rejected candidates are rolled back. The
//! search ends after a full walk that keeps nothing, leaving a tree where no
//! single substitution fails.

use tracing::{debug, trace};

use crate::case::{CaseOutcome, TestCase};

/// Outcome of a shrink search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shrunk {
    /// Accepted substitutions.
    pub shrinks: usize,
    /// Replays performed, accepted or not.
    pub attempts: usize,
    /// Why the minimal case fails.
    pub reason: String,
    /// The counterexample after each accepted substitution.
    pub steps: Vec<String>,
}

/// Shrinks a failing [`TestCase`] in place.
pub struct ShrinkSearch<'a> {
    case: &'a TestCase,
    shrink_limit: usize,
}

impl<'a> ShrinkSearch<'a> {
    /// Default cap on accepted substitutions.
    pub const DEFAULT_LIMIT: usize = 1000;

    pub fn new(case: &'a TestCase) -> Self {
        ShrinkSearch {
            case,
            shrink_limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Stop after `limit` accepted substitutions.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.shrink_limit = limit;
        self
    }

    /// Minimize the case, which last failed for `reason`.
    pub fn run(self, reason: String) -> Shrunk {
        let mut shrunk = Shrunk {
            shrinks: 0,
            attempts: 0,
            reason,
            steps: Vec::new(),
        };
        self.case.tree_mut().compact();

        while shrunk.shrinks < self.shrink_limit {
            match self.improve(&mut shrunk.attempts) {
                Some(reason) => {
                    shrunk.shrinks += 1;
                    shrunk.reason = reason;
                    let counterexample = self.case.counterexample();
                    debug!(
                        shrinks = shrunk.shrinks,
                        counterexample = %counterexample,
                        "accepted shrink"
                    );
                    shrunk.steps.push(counterexample);
                }
                None => break,
            }
        }

        debug!(
            shrinks = shrunk.shrinks,
            attempts = shrunk.attempts,
            "shrink search finished"
        );
        shrunk
    }

    /// Walk the tree once and keep the first candidate that still fails.
    fn improve(&self, attempts: &mut usize) -> Option<String> {
        let order = self.case.tree().preorder();
        for node in order {
            let Some(candidates) = self.case.tree().candidates(node) else {
                continue;
            };
            for candidate in candidates {
                let snapshot = self.case.tree().clone();
                self.case.tree_mut().replace_value_any(node, candidate);
                *attempts += 1;

                match self.case.run() {
                    CaseOutcome::Failed(reason) => {
                        self.case.tree_mut().compact();
                        return Some(reason);
                    }
                    outcome => {
                        trace!(node = node.index(), ?outcome, "rejected shrink");
                        *self.case.tree_mut() = snapshot;
                    }
                }
            }
        }
        None
    }
}
