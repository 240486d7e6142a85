//! Generator combinators for property-based testing.
//!
//! A [`Generator`] produces one value from the implicit execution context and
//! proposes shrink candidates for a value it produced. [`Gen`] is the cheap,
//! clonable handle generators are composed through.
//!
//! Values are obtained with [`Gen::pick`]. Inside a test case every pick is
//! recorded as a node of the case's decision tree, so combinators that pick
//! from nested generators get their nested values shrunk independently.

mod collection;
mod numeric;

use std::fmt::Debug;
use std::rc::Rc;

use crate::context;
use crate::data::Size;
use crate::error::{GenerationFailure, Result};
use crate::shrink::{self, Shrinks};
use crate::tree;

/// Attempts a [`Gen::filter`] makes before giving up.
pub const MAX_FILTER_ATTEMPTS: usize = 100;

/// Something that can produce values of type `T`.
pub trait Generator<T: 'static> {
    /// Produce a value using the current size and random source.
    fn produce(&self) -> Result<T>;

    /// Candidates simpler than `value`, simplest first.
    fn shrink(&self, _value: T) -> Shrinks<T> {
        shrink::nothing()
    }
}

/// A generator for test data of type `T`.
///
/// Generators are explicit, first-class values that can be composed
/// using combinator functions.
pub struct Gen<T: 'static> {
    generator: Rc<dyn Generator<T>>,
}

impl<T: 'static> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            generator: Rc::clone(&self.generator),
        }
    }
}

struct FnGenerator<F>(F);

impl<T: 'static, F> Generator<T> for FnGenerator<F>
where
    F: Fn() -> Result<T>,
{
    fn produce(&self) -> Result<T> {
        (self.0)()
    }
}

struct WithShrinks<T: 'static> {
    inner: Gen<T>,
    shrinker: Box<dyn Fn(T) -> Shrinks<T>>,
}

impl<T: 'static> Generator<T> for WithShrinks<T> {
    fn produce(&self) -> Result<T> {
        self.inner.produce()
    }

    fn shrink(&self, value: T) -> Shrinks<T> {
        (self.shrinker)(value)
    }
}

struct NoShrink<T: 'static> {
    inner: Gen<T>,
}

impl<T: 'static> Generator<T> for NoShrink<T> {
    fn produce(&self) -> Result<T> {
        context::without_recording(|| self.inner.produce())
    }
}

impl<T: 'static> Gen<T> {
    /// Wrap a [`Generator`] implementation.
    pub fn from_generator(generator: impl Generator<T> + 'static) -> Self {
        Gen {
            generator: Rc::new(generator),
        }
    }

    /// Create a generator from a function. It does not shrink on its own;
    /// values it picks from other generators are shrunk through them.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<T> + 'static,
    {
        Gen::from_generator(FnGenerator(f))
    }

    /// Create a generator that always produces the same value.
    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Gen::new(move || Ok(value.clone()))
    }

    /// Produce a value directly, without recording it.
    pub fn produce(&self) -> Result<T> {
        self.generator.produce()
    }

    /// Shrink candidates for `value`.
    pub fn shrink(&self, value: T) -> Shrinks<T> {
        self.generator.shrink(value)
    }

    /// Replace the shrinking strategy, keeping how values are produced.
    pub fn with_shrinks<F>(self, shrinker: F) -> Gen<T>
    where
        F: Fn(T) -> Shrinks<T> + 'static,
    {
        Gen::from_generator(WithShrinks {
            inner: self,
            shrinker: Box::new(shrinker),
        })
    }

    /// Produce values that are never shrunk, neither as a whole nor through
    /// anything picked while producing them.
    pub fn no_shrink(self) -> Gen<T> {
        Gen::from_generator(NoShrink { inner: self })
    }

    pub(crate) fn identity(&self) -> *const () {
        Rc::as_ptr(&self.generator) as *const ()
    }
}

impl<T> Gen<T>
where
    T: Clone + Debug + 'static,
{
    /// Obtain a value from this generator.
    ///
    /// Inside a test case the value is recorded as the next child of the
    /// current decision-tree node, or served from that child on replay.
    /// Otherwise the generator produces directly, drawing from the random
    /// source exactly as a recorded pick would.
    ///
    /// # Panics
    ///
    /// Panics when no execution context is active.
    pub fn pick(&self) -> Result<T> {
        match context::current_node() {
            Some((tree, node)) => tree::pick(&tree, node, self),
            None => context::with_random(context::split_random(), || self.produce()),
        }
    }

    /// Map a function over the generated values.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + 'static,
        U: 'static,
    {
        Gen::new(move || self.pick().map(&f))
    }

    /// Bind/flatmap for dependent generation.
    pub fn bind<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> Gen<U> + 'static,
        U: Clone + Debug + 'static,
    {
        Gen::new(move || {
            let value = self.pick()?;
            f(value).pick()
        })
    }

    /// Filter generated values by a predicate.
    ///
    /// Retries with a growing size, failing generation after
    /// [`MAX_FILTER_ATTEMPTS`] rejected values. Only the accepted value is
    /// recorded, so shrinking works on it alone; a shrunk value the predicate
    /// rejects fails generation.
    pub fn filter<F>(self, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        Gen::new(move || {
            let size = context::current_size();
            for attempt in 0..MAX_FILTER_ATTEMPTS {
                let seed = context::split_random();
                let attempt_size = Size::new(size.get() + attempt);
                let draw = || {
                    context::with_random(seed, || {
                        context::with_size(attempt_size, || self.pick())
                    })
                };

                let trial = context::without_recording(&draw)?;
                if !predicate(&trial) {
                    continue;
                }
                if !context::is_recording() {
                    return Ok(trial);
                }
                // Same seed and size, so this records the value just accepted
                // unless replay substituted it.
                let value = draw()?;
                if predicate(&value) {
                    return Ok(value);
                }
                return Err(GenerationFailure::new("filter rejected a replayed value"));
            }
            Err(GenerationFailure::new(format!(
                "filter rejected {MAX_FILTER_ATTEMPTS} consecutive values"
            )))
        })
    }

    /// Generate with a fixed size.
    pub fn resize(self, size: Size) -> Gen<T> {
        Gen::new(move || context::with_size(size, || self.pick()))
    }

    /// Generate with the size transformed by `f`.
    pub fn scale<F>(self, f: F) -> Gen<T>
    where
        F: Fn(Size) -> Size + 'static,
    {
        Gen::new(move || context::with_size(f(context::current_size()), || self.pick()))
    }

    /// Build the generator from the current size.
    pub fn sized<F>(f: F) -> Gen<T>
    where
        F: Fn(Size) -> Gen<T> + 'static,
    {
        Gen::new(move || f(context::current_size()).pick())
    }

    /// Pick from one of `gens`. Shrinks toward earlier alternatives.
    pub fn one_of(gens: Vec<Gen<T>>) -> Gen<T> {
        if gens.is_empty() {
            return Gen::new(|| Err(GenerationFailure::new("one_of called with no generators")));
        }
        let index = Gen::<usize>::range(0, gens.len() - 1);
        Gen::new(move || gens[index.pick()?].pick())
    }

    /// Pick one of `items`. Shrinks toward earlier items.
    pub fn element_of(items: Vec<T>) -> Gen<T> {
        if items.is_empty() {
            return Gen::new(|| Err(GenerationFailure::new("element_of called with no items")));
        }
        let index = Gen::<usize>::range(0, items.len() - 1);
        Gen::new(move || Ok(items[index.pick()?].clone()))
    }
}

/// Types with a canonical generator.
pub trait Arbitrary: Clone + Debug + 'static {
    /// The default generator for this type.
    fn arbitrary() -> Gen<Self>;
}
