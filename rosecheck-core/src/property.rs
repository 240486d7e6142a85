//! Property definitions for property-based testing.

use std::fmt::Debug;
use std::rc::Rc;

use tracing::debug;

use crate::case::{Body, CaseOutcome, TestCase, Verdict};
use crate::data::{Config, Seed, Size};
use crate::error::{Error, Result, ShrinkStep, TestResult};
use crate::gen::Gen;
use crate::search::ShrinkSearch;

/// A property that can be tested with generated inputs.
///
/// The body picks whatever inputs it needs and returns a verdict. Every
/// pick is recorded, so a failure shrinks each input independently.
pub struct Property {
    body: Body,
    variable_name: Option<String>,
}

impl Property {
    /// Create a property from a body returning anything convertible to a
    /// [`Verdict`]: `bool`, `()`, `Result<(), E>` or a `Verdict` itself.
    pub fn new<V, F>(body: F) -> Self
    where
        V: Into<Verdict>,
        F: Fn() -> Result<V> + 'static,
    {
        Property {
            body: Rc::new(move || -> Result<Verdict> { body().map(Into::into) }),
            variable_name: None,
        }
    }

    /// Create a property that checks a boolean condition.
    pub fn for_all<T, F>(generator: Gen<T>, condition: F) -> Self
    where
        T: Clone + Debug + 'static,
        F: Fn(&T) -> bool + 'static,
    {
        Property::new(move || {
            let input = generator.pick()?;
            Ok(condition(&input))
        })
    }

    /// Create a property that checks a boolean condition with a named variable.
    pub fn for_all_named<T, F>(generator: Gen<T>, variable_name: &str, condition: F) -> Self
    where
        T: Clone + Debug + 'static,
        F: Fn(&T) -> bool + 'static,
    {
        let mut property = Property::for_all(generator, condition);
        property.variable_name = Some(variable_name.to_string());
        property
    }

    /// Run this property with the given configuration.
    pub fn run(&self, config: &Config) -> TestResult {
        self.run_with_context(config, None, None)
    }

    /// Run this property with the given configuration and context information.
    pub fn run_with_context(
        &self,
        config: &Config,
        property_name: Option<&str>,
        module_path: Option<&str>,
    ) -> TestResult {
        let property_name = property_name.map(|s| s.to_string());
        let module_path = module_path.map(|s| s.to_string());

        if let Err(error) = config.validate() {
            let message = match error {
                Error::InvalidConfig { message } => message,
                other => other.to_string(),
            };
            return TestResult::InvalidConfig {
                message,
                property_name,
                module_path,
            };
        }

        let run_seed = config.seed.unwrap_or_else(Seed::random);
        debug!(seed = %run_seed, tests = config.test_limit, "running property");

        let mut seed = run_seed;
        let mut passed = 0;
        let mut discarded = 0;
        let mut test_num = 0;

        while passed < config.test_limit {
            let size = Size::new((test_num * config.size_limit) / config.test_limit)
                .clamp_max(config.size_limit);
            let (case_seed, next_seed) = seed.split();
            seed = next_seed;
            test_num += 1;

            let case = TestCase::new(size, case_seed, Rc::clone(&self.body));
            match case.run() {
                CaseOutcome::Passed => passed += 1,
                CaseOutcome::Discarded => {
                    discarded += 1;
                    if discarded >= config.discard_limit {
                        debug!(discarded, "giving up");
                        return TestResult::Discard {
                            limit: config.discard_limit,
                            property_name,
                            module_path,
                        };
                    }
                }
                CaseOutcome::GenerationFailed(failure) => {
                    debug!(reason = %failure.reason, "generation failed");
                    return TestResult::GenerationFailed {
                        reason: failure.reason,
                        tests_run: passed,
                        property_name,
                        module_path,
                    };
                }
                CaseOutcome::Failed(reason) => {
                    let counterexample = case.counterexample();
                    debug!(
                        tests_run = passed + 1,
                        counterexample = %counterexample,
                        "property failed, shrinking"
                    );
                    let shrunk = ShrinkSearch::new(&case)
                        .with_limit(config.shrink_limit)
                        .run(reason);

                    let shrink_steps = std::iter::once(counterexample)
                        .chain(shrunk.steps)
                        .enumerate()
                        .map(|(step, counterexample)| ShrinkStep {
                            counterexample,
                            step,
                            variable_name: self.variable_name.clone(),
                        })
                        .collect();

                    return TestResult::Fail {
                        counterexample: case.counterexample(),
                        tests_run: passed + 1,
                        shrinks_performed: shrunk.shrinks,
                        property_name,
                        module_path,
                        reason: shrunk.reason,
                        seed: run_seed,
                        shrink_steps,
                    };
                }
            }
        }

        TestResult::Pass {
            tests_run: passed,
            property_name,
            module_path,
        }
    }

    /// Run this property, turning anything but a pass into an [`Error`].
    pub fn check(&self, config: &Config) -> std::result::Result<usize, Error> {
        self.run(config).into_result()
    }
}

/// Create a property from a body.
pub fn property<V, F>(body: F) -> Property
where
    V: Into<Verdict>,
    F: Fn() -> Result<V> + 'static,
{
    Property::new(body)
}

/// Create a property that checks a boolean condition.
pub fn for_all<T, F>(generator: Gen<T>, condition: F) -> Property
where
    T: Clone + Debug + 'static,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all(generator, condition)
}

/// Create a property that checks a boolean condition with a named variable.
pub fn for_all_named<T, F>(generator: Gen<T>, variable_name: &str, condition: F) -> Property
where
    T: Clone + Debug + 'static,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all_named(generator, variable_name, condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context;
    use std::cell::RefCell;

    #[test]
    fn test_property_success() {
        let gen = Gen::bool();
        #[allow(clippy::nonminimal_bool)]
        let prop = for_all(gen, |&b| b || !b);
        let config = Config::default();

        match prop.run(&config) {
            TestResult::Pass { tests_run: 100, .. } => (),
            other => panic!("Expected success, got: {other:?}"),
        }
    }

    #[test]
    fn test_property_failure() {
        let gen = Gen::<i32>::int_range(-5, 5);
        let prop = for_all(gen, |&x| x > 0);
        let config = Config::default().with_tests(20);

        match prop.run(&config) {
            TestResult::Fail { counterexample, .. } => assert_eq!(counterexample, "0"),
            other => panic!("Expected failure, got: {other:?}"),
        }
    }

    #[test]
    fn test_boolean_generator_reliability() {
        let gen = Gen::bool();
        let prop = for_all(gen, |&b| b);
        let config = Config::default().with_tests(50);

        match prop.run(&config) {
            TestResult::Fail { counterexample, .. } => assert_eq!(counterexample, "false"),
            other => panic!("Boolean generator should produce both true and false, got: {other:?}"),
        }
    }

    #[test]
    fn test_variable_name_tracking() {
        let prop = for_all_named(Gen::<i32>::int_range(5, 20), "n", |&n| n < 10);
        let result = prop.run(&Config::default().with_seed(Seed::from_u64(4)));

        if let TestResult::Fail {
            shrink_steps,
            counterexample,
            ..
        } = result
        {
            assert_eq!(counterexample, "10");
            assert_eq!(shrink_steps[0].step, 0);
            for step in shrink_steps {
                assert_eq!(step.variable_name, Some("n".to_string()));
            }
        } else {
            panic!("Expected a failing test result for variable name tracking");
        }
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let prop = for_all(Gen::vec_of(Gen::<u8>::range(0, 9)), |xs| xs.len() < 5);
        let config = Config::default().with_seed(Seed::from_u64(17));
        let first = prop.run(&config);
        assert!(first.is_fail());
        assert_eq!(prop.run(&config), first);
    }

    #[test]
    fn test_size_schedule() {
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&sizes);
        let prop = property(move || {
            recorded.borrow_mut().push(context::current_size().get());
            Ok(true)
        });
        let result = prop.run(&Config::default().with_tests(10).with_size_limit(50));
        assert!(result.is_pass());
        assert_eq!(*sizes.borrow(), vec![0, 5, 10, 15, 20, 25, 30, 35, 40, 45]);
    }

    #[test]
    fn test_discard_limit() {
        let prop = property(|| Ok(Verdict::Discard));
        let result = prop.run(&Config::default().with_discards(5));
        assert_eq!(
            result,
            TestResult::Discard {
                limit: 5,
                property_name: None,
                module_path: None,
            }
        );
    }

    #[test]
    fn test_generation_failure_aborts_run() {
        let prop = for_all(Gen::<i32>::int_range(0, 10).filter(|x| *x > 10), |_| true);
        match prop.run(&Config::default()) {
            TestResult::GenerationFailed { tests_run: 0, reason, .. } => {
                assert!(reason.contains("filter"))
            }
            other => panic!("Expected generation failure, got: {other:?}"),
        }
    }

    #[test]
    fn test_panicking_body_fails() {
        let prop = for_all(Gen::<u32>::range(0, 1000), |&x| {
            assert!(x < 10, "too large");
            true
        });
        match prop.run(&Config::default()) {
            TestResult::Fail {
                counterexample,
                reason,
                ..
            } => {
                assert_eq!(counterexample, "10");
                assert_eq!(reason, "panicked: too large");
            }
            other => panic!("Expected failure, got: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_is_not_a_generation_failure() {
        let prop = for_all(Gen::bool(), |_| true);
        let config = Config::default().with_tests(0);

        match prop.run(&config) {
            TestResult::InvalidConfig { message, .. } => {
                assert_eq!(message, "test_limit must be at least 1")
            }
            other => panic!("Expected invalid configuration, got: {other:?}"),
        }
        assert!(matches!(
            prop.check(&config),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_check() {
        let passed = for_all(Gen::bool(), |_| true).check(&Config::default());
        assert!(matches!(passed, Ok(100)));

        let failed = for_all(Gen::<u8>::range(0, 9), |&x| x < 5).check(&Config::default());
        match failed {
            Err(Error::PropertyFailed { counterexample, .. }) => assert_eq!(counterexample, "5"),
            other => panic!("Expected property failure, got: {other:?}"),
        }
    }
}
