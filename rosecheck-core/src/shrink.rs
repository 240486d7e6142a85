//! Lazy shrink sequences.
//!
//! A shrink sequence is a finite, forward-only iterator of candidates that are
//! simpler than the value it was derived from. It never yields that value. It
//! owns everything it needs, so the shrink search may drop it half-consumed.

use std::iter;
use std::rc::Rc;

/// A lazy sequence of shrink candidates.
pub type Shrinks<T> = Box<dyn Iterator<Item = T>>;

/// The empty shrink sequence.
pub fn nothing<T: 'static>() -> Shrinks<T> {
    Box::new(iter::empty())
}

/// Candidates moving `value` toward `target`.
///
/// Yields `target` first, then values whose distance from `value` halves
/// each step, ending one step away from `value`.
pub fn towards(value: i128, target: i128) -> impl Iterator<Item = i128> {
    let distance = value - target;
    iter::successors((distance != 0).then_some(distance), |d| {
        let next = d / 2;
        (next != 0).then_some(next)
    })
    .map(move |d| value - d)
}

/// `false` is simpler than `true`.
pub fn boolean(value: bool) -> Shrinks<bool> {
    if value {
        Box::new(iter::once(false))
    } else {
        nothing()
    }
}

/// Candidates removing contiguous chunks of `items`.
///
/// Chunk sizes start at the full length (the empty vector) and halve down
/// to single elements.
pub fn remove_chunks<T: Clone + 'static>(items: Vec<T>) -> Shrinks<Vec<T>> {
    let len = items.len();
    let items = Rc::new(items);
    let sizes = iter::successors((len > 0).then_some(len), |size| {
        (*size > 1).then_some(size / 2)
    });
    Box::new(sizes.flat_map(move |chunk| {
        let items = Rc::clone(&items);
        (0..len).step_by(chunk).map(move |start| {
            let end = (start + chunk).min(len);
            items[..start]
                .iter()
                .chain(&items[end..])
                .cloned()
                .collect::<Vec<T>>()
        })
    }))
}

/// Candidates replacing one element of `items` at a time with each of its
/// own shrinks, leftmost element first.
pub fn each_element<T, F>(items: Vec<T>, shrink_element: F) -> Shrinks<Vec<T>>
where
    T: Clone + 'static,
    F: Fn(T) -> Shrinks<T> + 'static,
{
    let items = Rc::new(items);
    Box::new((0..items.len()).flat_map(move |index| {
        let items = Rc::clone(&items);
        shrink_element(items[index].clone()).map(move |candidate| {
            let mut shrunk = items.to_vec();
            shrunk[index] = candidate;
            shrunk
        })
    }))
}
