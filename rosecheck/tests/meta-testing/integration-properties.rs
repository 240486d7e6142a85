//! Integration properties
//!
//! These properties run whole properties from inside other properties, the
//! way a user's test suite drives the runner.

use crate::assert_passes;
use rosecheck::*;

/// Property: a property run from a fixed seed always reports the same result
pub fn test_seeded_runs_reproduce() {
    let prop = for_all_named(Gen::<u64>::range(0, 10000), "seed", |&seed| {
        let inner = for_all(Gen::vec_of(Gen::<i32>::int_range(0, 20)), |xs| {
            xs.iter().sum::<i32>() < 40
        });
        let config = Config::default().with_tests(50).with_seed(Seed::from_u64(seed));
        inner.run(&config) == inner.run(&config)
    });
    assert_passes(prop, 20);
}

/// Property: the outcome of an inner property matches what its inputs imply
pub fn test_nested_property_runs() {
    let prop = for_all_named(Gen::<u8>::range(0, 10), "limit", |&limit| {
        let inner = for_all(Gen::<u8>::range(0, 5), move |&x| x <= limit);
        match inner.run(&Config::default()) {
            TestResult::Pass { tests_run, .. } => limit >= 5 && tests_run == 100,
            TestResult::Fail { counterexample, .. } => {
                limit < 5 && counterexample == (limit + 1).to_string()
            }
            _ => false,
        }
    });
    assert_passes(prop, 30);
}
