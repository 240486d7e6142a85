//! Generator invariant properties
//!
//! These properties check that generators are deterministic in their seed,
//! respect their bounds and the size, and that sampling never records.

use crate::{arbitrary_seed, arbitrary_size, assert_passes};
use rosecheck::*;

/// Property: sampling twice with the same size and seed gives the same value
pub fn test_sampling_is_deterministic() {
    let prop = for_all_named(
        Gen::<(Size, Seed)>::tuple_of(arbitrary_size(), arbitrary_seed()),
        "(size, seed)",
        |&(size, seed)| {
            let gen = Gen::vec_of(Gen::option_of(Gen::ascii_string()));
            sample_value(size, seed, &gen) == sample_value(size, seed, &gen)
        },
    );
    assert_passes(prop, 30);
}

/// Property: ranges and collection lengths stay within their bounds
pub fn test_generator_size_bounds() {
    let prop = for_all_named(
        Gen::<(Size, Seed)>::tuple_of(arbitrary_size(), arbitrary_seed()),
        "(size, seed)",
        |&(size, seed)| {
            let ints = Gen::vec_of(Gen::<i16>::range(-7, 300));
            match sample_value(size, seed, &ints) {
                Ok(values) => {
                    values.len() <= size.get() && values.iter().all(|v| (-7..=300).contains(v))
                }
                Err(_) => false,
            }
        },
    );
    assert_passes(prop, 50);
}

/// Property: sampling never creates decision-tree nodes
pub fn test_sampling_records_nothing() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed| {
        let before = nodes_created();
        let gen = Gen::<(bool, String, Option<u8>)>::triple_of(
            Gen::bool(),
            Gen::ascii_string(),
            Gen::option_of(Gen::<u8>::range(0, 3)),
        );
        let sampled = samples(5, Size::new(10), seed, &gen).is_ok();
        sampled && nodes_created() == before
    });
    assert_passes(prop, 20);
}
