//! Sampling generators outside of a property.
//!
//! Sampling establishes a size and a random source but no decision tree, so
//! every pick produces directly and nothing is recorded.

use std::fmt::Debug;

use crate::context::Context;
use crate::data::{Seed, Size};
use crate::error::Result;
use crate::gen::Gen;

/// Render a value for display.
pub fn render<T: Debug + ?Sized>(value: &T) -> String {
    format!("{value:?}")
}

/// Generate one value from `gen` at the given size and seed.
pub fn sample_value<T>(size: Size, seed: Seed, gen: &Gen<T>) -> Result<T>
where
    T: Clone + Debug + 'static,
{
    Context::new(size, seed).run(|| gen.pick())
}

/// Generate one value and print it to stdout.
pub fn sample<T>(size: Size, seed: Seed, gen: &Gen<T>) -> Result<()>
where
    T: Clone + Debug + 'static,
{
    let value = sample_value(size, seed, gen)?;
    println!("{}", render(&value));
    Ok(())
}

/// Generate `count` values from successive seeds split off `seed`.
pub fn samples<T>(count: usize, size: Size, seed: Seed, gen: &Gen<T>) -> Result<Vec<T>>
where
    T: Clone + Debug + 'static,
{
    let mut seed = seed;
    (0..count)
        .map(|_| {
            let (value_seed, next) = seed.split();
            seed = next;
            sample_value(size, value_seed, gen)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::nodes_created;

    #[test]
    fn test_sampling_is_deterministic() {
        let gen = Gen::vec_of(Gen::<i64>::range(-1000, 1000));
        let first = sample_value(Size::new(40), Seed::from_u64(8), &gen).unwrap();
        let second = sample_value(Size::new(40), Seed::from_u64(8), &gen).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sampling_records_nothing() {
        let before = nodes_created();
        let gen = Gen::<(bool, Vec<u8>)>::tuple_of(
            Gen::bool(),
            Gen::vec_of(Gen::<u8>::range(0, 9)),
        );
        samples(20, Size::new(30), Seed::from_u64(2), &gen).unwrap();
        sample(Size::new(30), Seed::from_u64(2), &gen).unwrap();
        assert_eq!(nodes_created(), before);
    }

    #[test]
    fn test_samples_vary() {
        let gen = Gen::<u32>::range(0, 1_000_000);
        let values = samples(50, Size::new(100), Seed::from_u64(5), &gen).unwrap();
        assert_eq!(values.len(), 50);
        assert!(values.iter().any(|v| *v != values[0]));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&vec![1, 2]), "[1, 2]");
        assert_eq!(render("hi"), "\"hi\"");
    }
}
