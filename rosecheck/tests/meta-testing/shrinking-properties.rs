//! Shrinking correctness properties
//!
//! These properties ensure that shrinking behaves correctly - that it always
//! proposes simpler values and converges to minimal counterexamples.

use crate::{arbitrary_seed, arbitrary_size, assert_passes};
use rosecheck::*;

/// Property: integer shrinks move strictly closer to the origin
pub fn test_int_shrinks_are_smaller() {
    let prop = for_all_named(
        Gen::<(i64, i64)>::tuple_of(
            Gen::<i64>::range(-1000, 1000),
            Gen::<i64>::range(-10, 10),
        ),
        "(value, low)",
        |&(value, low)| {
            let (min, max) = (low.min(value), value.max(10));
            let origin = if min > 0 {
                min
            } else if max < 0 {
                max
            } else {
                0
            };
            Gen::<i64>::range(min, max).shrink(value).all(|candidate| {
                candidate != value
                    && (min..=max).contains(&candidate)
                    && (candidate - origin).abs() < (value - origin).abs()
            })
        },
    );
    assert_passes(prop, 100);
}

/// Property: vector shrinks are shorter, or equally long with one element shrunk
pub fn test_vec_shrinks_are_smaller() {
    let prop = for_all_named(
        Gen::<(Size, Seed)>::tuple_of(arbitrary_size(), arbitrary_seed()),
        "(size, seed)",
        |&(size, seed)| {
            let gen = Gen::vec_of(Gen::<i32>::int_range(0, 100));
            let Ok(original) = sample_value(size, seed, &gen) else {
                return false;
            };
            gen.shrink(original.clone()).all(|candidate| {
                candidate.len() < original.len()
                    || (candidate.len() == original.len()
                        && candidate
                            .iter()
                            .zip(&original)
                            .filter(|(c, o)| c != o)
                            .all(|(c, o)| c < o))
            })
        },
    );
    assert_passes(prop, 30);
}

/// Property: for any threshold, a failing `v < threshold` shrinks to exactly
/// the threshold
pub fn test_shrinking_finds_threshold() {
    let prop = for_all_named(
        Gen::<(i32, u64)>::tuple_of(Gen::<i32>::int_range(1, 60), Gen::<u64>::range(0, 1000)),
        "(threshold, seed)",
        |&(threshold, seed)| {
            let inner = for_all(Gen::<i32>::int_range(0, 100), move |&v| v < threshold);
            match inner.run(&Config::default().with_seed(Seed::from_u64(seed))) {
                TestResult::Fail { counterexample, .. } => counterexample == threshold.to_string(),
                _ => false,
            }
        },
    );
    assert_passes(prop, 20);
}
