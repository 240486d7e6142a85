//! Error and outcome types for rosecheck.

use std::fmt;
use thiserror::Error;

use crate::data::Seed;

/// A generator could not produce a valid value.
///
/// This is a defect in the generator or its constraints, never evidence
/// against the property under test.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("generation failed: {reason}")]
pub struct GenerationFailure {
    pub reason: String,
}

impl GenerationFailure {
    /// Create a failure with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        GenerationFailure {
            reason: reason.into(),
        }
    }
}

/// Main error type for rosecheck runs.
#[derive(Error, Debug)]
pub enum Error {
    /// Property test failed with a counterexample.
    #[error("Property test failed: {counterexample}")]
    PropertyFailed {
        counterexample: String,
        tests_run: usize,
        shrinks_performed: usize,
    },

    /// Too many test cases were discarded.
    #[error("Too many test cases discarded (limit: {limit})")]
    TooManyDiscards { limit: usize },

    /// A generator failed while producing the initial input of a test case.
    #[error(transparent)]
    GenerationFailed(#[from] GenerationFailure),

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type for generator evaluation.
pub type Result<T> = std::result::Result<T, GenerationFailure>;

/// One accepted step of the shrink search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkStep {
    /// The counterexample at this step, rendered.
    pub counterexample: String,
    /// The step number (0 = original failure, 1+ = accepted shrinks).
    pub step: usize,
    /// Optional variable name for this input (e.g., "xs", "n", "input").
    pub variable_name: Option<String>,
}

/// Outcome of a property test.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    /// Test passed successfully.
    Pass {
        tests_run: usize,
        property_name: Option<String>,
        module_path: Option<String>,
    },

    /// Test failed with a counterexample.
    Fail {
        counterexample: String,
        tests_run: usize,
        shrinks_performed: usize,
        property_name: Option<String>,
        module_path: Option<String>,
        /// Why the minimal counterexample fails.
        reason: String,
        /// Seed the run started from; [`Config::with_seed`](crate::Config::with_seed)
        /// reproduces the failure.
        seed: Seed,
        /// The shrinking progression showing how we reached the minimal counterexample.
        shrink_steps: Vec<ShrinkStep>,
    },

    /// Too many test cases were discarded.
    Discard {
        limit: usize,
        property_name: Option<String>,
        module_path: Option<String>,
    },

    /// A generator could not produce an input; the run was aborted.
    GenerationFailed {
        reason: String,
        tests_run: usize,
        property_name: Option<String>,
        module_path: Option<String>,
    },

    /// The configuration was rejected before any test ran.
    InvalidConfig {
        message: String,
        property_name: Option<String>,
        module_path: Option<String>,
    },
}

impl TestResult {
    /// Check if the property held.
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }

    /// Check if the property was falsified.
    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }

    /// Convert into a `Result`, returning the number of passing tests.
    pub fn into_result(self) -> std::result::Result<usize, Error> {
        match self {
            TestResult::Pass { tests_run, .. } => Ok(tests_run),
            TestResult::Fail {
                counterexample,
                tests_run,
                shrinks_performed,
                ..
            } => Err(Error::PropertyFailed {
                counterexample,
                tests_run,
                shrinks_performed,
            }),
            TestResult::Discard { limit, .. } => Err(Error::TooManyDiscards { limit }),
            TestResult::GenerationFailed { reason, .. } => {
                Err(Error::GenerationFailed(GenerationFailure { reason }))
            }
            TestResult::InvalidConfig { message, .. } => Err(Error::InvalidConfig { message }),
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass {
                tests_run,
                property_name,
                module_path,
            } => {
                if let Some(module) = module_path {
                    writeln!(f, "━━━ {} ━━━", module)?;
                }

                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ✓ {} passed {} tests.", prop_name, tests_run)
            }
            TestResult::Fail {
                counterexample,
                tests_run,
                shrinks_performed,
                property_name,
                module_path,
                reason,
                seed,
                shrink_steps,
            } => {
                if let Some(module) = module_path {
                    writeln!(f, "━━━ {} ━━━", module)?;
                }

                let prop_name = property_name.as_deref().unwrap_or("property");
                writeln!(
                    f,
                    "  ✗ {} failed after {} tests and {} shrinks.",
                    prop_name, tests_run, shrinks_performed
                )?;

                if !shrink_steps.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "    Shrinking progression:")?;
                    for step in shrink_steps {
                        match (&step.variable_name, step.step) {
                            (Some(var_name), n) => writeln!(
                                f,
                                "      │ forAll {} = {} -- {}",
                                n, step.counterexample, var_name
                            )?,
                            (None, 0) => {
                                writeln!(f, "      │ Original: {}", step.counterexample)?
                            }
                            (None, n) => {
                                writeln!(f, "      │ Step {}: {}", n, step.counterexample)?
                            }
                        }
                    }
                    writeln!(f)?;
                }

                writeln!(f, "    === {} ===", reason)?;
                writeln!(f, "    Reproduce with: {}", seed)?;
                write!(f, "    Minimal counterexample: {}", counterexample)
            }
            TestResult::Discard {
                limit,
                property_name,
                module_path,
            } => {
                if let Some(module) = module_path {
                    writeln!(f, "━━━ {} ━━━", module)?;
                }

                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ⚐ {} gave up after {} discards", prop_name, limit)
            }
            TestResult::GenerationFailed {
                reason,
                tests_run,
                property_name,
                module_path,
            } => {
                if let Some(module) = module_path {
                    writeln!(f, "━━━ {} ━━━", module)?;
                }

                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(
                    f,
                    "  ⚠ {} aborted after {} tests: {}",
                    prop_name, tests_run, reason
                )
            }
            TestResult::InvalidConfig {
                message,
                property_name,
                module_path,
            } => {
                if let Some(module) = module_path {
                    writeln!(f, "━━━ {} ━━━", module)?;
                }

                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ⚠ {} not run: invalid configuration: {}", prop_name, message)
            }
        }
    }
}
