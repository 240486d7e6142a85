//! Integer, boolean and character generators.

use crate::context;
use crate::data::Size;
use crate::error::{GenerationFailure, Result};
use crate::gen::{Arbitrary, Gen, Generator};
use crate::shrink::{self, Shrinks};

/// Uniform integers in `[min, max]`, optionally narrowed around the origin
/// by the current size.
struct Ranged<T> {
    min: T,
    max: T,
    sized: bool,
}

/// The simplest value of `[min, max]`: zero clamped into the range.
fn origin(min: i128, max: i128) -> i128 {
    if min > 0 {
        min
    } else if max < 0 {
        max
    } else {
        0
    }
}

/// Narrow `[min, max]` around its origin in proportion to `size`, reaching
/// the full range at [`Size::NOMINAL`].
fn sized_bounds(min: i128, max: i128, size: Size) -> (i128, i128) {
    let nominal = Size::NOMINAL.get() as i128;
    let scale = size.get().min(Size::NOMINAL.get()) as i128;
    let origin = origin(min, max);
    (
        origin - (origin - min) * scale / nominal,
        origin + (max - origin) * scale / nominal,
    )
}

fn draw(min: i128, max: i128, sized: bool) -> Result<i128> {
    if min > max {
        return Err(GenerationFailure::new(format!("empty range [{min}, {max}]")));
    }
    let (low, high) = if sized {
        sized_bounds(min, max, context::current_size())
    } else {
        (min, max)
    };
    let span = (high - low) as u128 + 1;
    let offset = if span > u64::MAX as u128 {
        context::next_u64()
    } else {
        context::next_bounded(span as u64)
    };
    Ok(low + offset as i128)
}

macro_rules! integral {
    ($($t:ty),* $(,)?) => {$(
        impl Generator<$t> for Ranged<$t> {
            fn produce(&self) -> Result<$t> {
                let value = draw(self.min as i128, self.max as i128, self.sized)?;
                Ok(value as $t)
            }

            fn shrink(&self, value: $t) -> Shrinks<$t> {
                let origin = origin(self.min as i128, self.max as i128);
                Box::new(shrink::towards(value as i128, origin).map(|candidate| candidate as $t))
            }
        }

        impl Gen<$t> {
            /// Uniform values in `[min, max]`, shrinking toward the value
            /// closest to zero.
            pub fn range(min: $t, max: $t) -> Self {
                Gen::from_generator(Ranged { min, max, sized: false })
            }

            /// Like [`Gen::range`], but the reachable part of the range grows
            /// with the size.
            pub fn sized_range(min: $t, max: $t) -> Self {
                Gen::from_generator(Ranged { min, max, sized: true })
            }
        }

        impl Arbitrary for $t {
            fn arbitrary() -> Gen<$t> {
                Gen::<$t>::sized_range(<$t>::MIN, <$t>::MAX)
            }
        }
    )*};
}

integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Gen<i32> {
    /// Generate an integer in the given range.
    pub fn int_range(min: i32, max: i32) -> Self {
        Self::range(min, max)
    }

    /// Generate a positive integer.
    pub fn positive() -> Self {
        Self::range(1, i32::MAX)
    }

    /// Generate a natural number (including zero).
    pub fn natural() -> Self {
        Self::range(0, i32::MAX)
    }
}

struct Boolean;

impl Generator<bool> for Boolean {
    fn produce(&self) -> Result<bool> {
        Ok(context::next_bool())
    }

    fn shrink(&self, value: bool) -> Shrinks<bool> {
        shrink::boolean(value)
    }
}

/// Primitive generators.
impl Gen<bool> {
    /// Generate a random boolean.
    pub fn bool() -> Self {
        Gen::from_generator(Boolean)
    }
}

impl Arbitrary for bool {
    fn arbitrary() -> Gen<bool> {
        Gen::bool()
    }
}

struct Ascii;

impl Generator<char> for Ascii {
    fn produce(&self) -> Result<char> {
        let code = b' ' + context::next_bounded(95) as u8;
        Ok(char::from(code))
    }

    fn shrink(&self, value: char) -> Shrinks<char> {
        Box::new(
            shrink::towards(value as i128, 'a' as i128)
                .filter_map(|code| u8::try_from(code).ok())
                .map(char::from),
        )
    }
}

impl Gen<char> {
    /// Printable ASCII characters, shrinking toward `'a'`.
    pub fn ascii() -> Self {
        Gen::from_generator(Ascii)
    }
}

impl Arbitrary for char {
    fn arbitrary() -> Gen<char> {
        Gen::ascii()
    }
}
