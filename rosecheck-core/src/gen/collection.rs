//! Collection, option and tuple generators.

use std::fmt::Debug;

use crate::gen::{Arbitrary, Gen, Generator};
use crate::error::Result;
use crate::shrink::{self, Shrinks};

struct VecOf<T: 'static> {
    element: Gen<T>,
    length: Gen<usize>,
}

impl<T: Clone + Debug + 'static> Generator<Vec<T>> for VecOf<T> {
    fn produce(&self) -> Result<Vec<T>> {
        let length = self.length.pick()?;
        (0..length).map(|_| self.element.pick()).collect()
    }

    fn shrink(&self, value: Vec<T>) -> Shrinks<Vec<T>> {
        let element = self.element.clone();
        Box::new(
            shrink::remove_chunks(value.clone())
                .chain(shrink::each_element(value, move |item| element.shrink(item))),
        )
    }
}

impl<T: Clone + Debug + 'static> Gen<Vec<T>> {
    /// Vectors of up to size elements.
    ///
    /// Shrinks by removing chunks of elements, then by shrinking single
    /// elements in place.
    pub fn vec_of(element: Gen<T>) -> Self {
        Gen::from_generator(VecOf {
            element,
            length: Gen::sized(|size| Gen::<usize>::range(0, size.get())),
        })
    }
}

impl Gen<String> {
    /// Strings built from characters of `chars`.
    pub fn string_of(chars: Gen<char>) -> Self {
        Gen::vec_of(chars).map(|chars| chars.into_iter().collect())
    }

    /// Strings of printable ASCII characters.
    pub fn ascii_string() -> Self {
        Gen::string_of(Gen::ascii())
    }
}

struct OptionOf<T: 'static> {
    inner: Gen<T>,
    tag: Gen<usize>,
}

impl<T: Clone + Debug + 'static> Generator<Option<T>> for OptionOf<T> {
    fn produce(&self) -> Result<Option<T>> {
        if self.tag.pick()? == 0 {
            return Ok(None);
        }
        self.inner.pick().map(Some)
    }

    fn shrink(&self, value: Option<T>) -> Shrinks<Option<T>> {
        match value {
            Some(value) => Box::new(std::iter::once(None).chain(self.inner.shrink(value).map(Some))),
            None => shrink::nothing(),
        }
    }
}

impl<T: Clone + Debug + 'static> Gen<Option<T>> {
    /// `None` about a quarter of the time, otherwise a value from `inner`.
    /// Shrinks to `None` first.
    pub fn option_of(inner: Gen<T>) -> Self {
        Gen::from_generator(OptionOf {
            inner,
            tag: Gen::<usize>::range(0, 3),
        })
    }
}

impl<A, B> Gen<(A, B)>
where
    A: Clone + Debug + 'static,
    B: Clone + Debug + 'static,
{
    /// Pairs picked component-wise; each component shrinks on its own.
    pub fn tuple_of(first: Gen<A>, second: Gen<B>) -> Self {
        Gen::new(move || Ok((first.pick()?, second.pick()?)))
    }
}

impl<A, B, C> Gen<(A, B, C)>
where
    A: Clone + Debug + 'static,
    B: Clone + Debug + 'static,
    C: Clone + Debug + 'static,
{
    /// Triples picked component-wise.
    pub fn triple_of(first: Gen<A>, second: Gen<B>, third: Gen<C>) -> Self {
        Gen::new(move || Ok((first.pick()?, second.pick()?, third.pick()?)))
    }
}

impl<T: Arbitrary> Arbitrary for Vec<T> {
    fn arbitrary() -> Gen<Self> {
        Gen::vec_of(T::arbitrary())
    }
}

impl<T: Arbitrary> Arbitrary for Option<T> {
    fn arbitrary() -> Gen<Self> {
        Gen::option_of(T::arbitrary())
    }
}

impl Arbitrary for String {
    fn arbitrary() -> Gen<Self> {
        Gen::ascii_string()
    }
}

impl<A: Arbitrary, B: Arbitrary> Arbitrary for (A, B) {
    fn arbitrary() -> Gen<Self> {
        Gen::tuple_of(A::arbitrary(), B::arbitrary())
    }
}

impl<A: Arbitrary, B: Arbitrary, C: Arbitrary> Arbitrary for (A, B, C) {
    fn arbitrary() -> Gen<Self> {
        Gen::triple_of(A::arbitrary(), B::arbitrary(), C::arbitrary())
    }
}
