//! Execution context: the implicit size, random source and decision-tree node.
//!
//! A [`Context`] is created once per top-level test-case run and entered for
//! every evaluation of that run (the initial one and every shrink replay).
//! While entered it is installed in a thread-local registry, so generators
//! reach it through free functions such as [`current_size`] and [`next_u64`]
//! instead of taking it as a parameter.
//!
//! The context is a stack of frames. Each frame overrides one value; lookups
//! see the innermost frame of the requested kind. Frames are pushed by scope
//! guards and popped when the guard drops, including while unwinding from a
//! panicking predicate.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::data::{Seed, Size};
use crate::tree::{NodeId, SharedTree};

#[derive(Clone)]
enum Frame {
    Size(Size),
    Random(Seed),
    Node(SharedTree, NodeId),
    /// Hides any outer `Node` frame.
    Sampling,
}

struct Frames {
    stack: Vec<Frame>,
}

thread_local! {
    // Innermost entered context last. Nesting happens when a property body
    // runs another property or samples a generator.
    static ACTIVE: RefCell<Vec<Rc<RefCell<Frames>>>> = const { RefCell::new(Vec::new()) };
}

/// Per-run execution context.
///
/// Contexts are deliberately `!Send`: one context and the tree it drives
/// belong to a single thread for their whole life.
pub struct Context {
    frames: Rc<RefCell<Frames>>,
}

impl Context {
    /// Create a context with base size and random source.
    pub fn new(size: Size, seed: Seed) -> Self {
        Context {
            frames: Rc::new(RefCell::new(Frames {
                stack: vec![Frame::Size(size), Frame::Random(seed)],
            })),
        }
    }

    /// Install this context as the innermost active one on the current thread.
    ///
    /// Entering a different context from inside an evaluation shadows the
    /// outer one until the returned guard drops.
    ///
    /// # Panics
    ///
    /// Panics if this context is already active.
    pub fn enter(&self) -> Entered<'_> {
        ACTIVE.with_borrow_mut(|active| {
            if active.iter().any(|entered| Rc::ptr_eq(entered, &self.frames)) {
                panic!("execution context entered while already active");
            }
            active.push(Rc::clone(&self.frames));
        });
        Entered {
            base_depth: self.frames.borrow().stack.len(),
            context: self,
        }
    }

    /// Run `f` with this context active.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let _entered = self.enter();
        f()
    }
}

/// Guard returned by [`Context::enter`]. Deactivates the context on drop.
pub struct Entered<'a> {
    context: &'a Context,
    base_depth: usize,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        // Unbalanced frames can only be left behind by leaked scope guards.
        self.context
            .frames
            .borrow_mut()
            .stack
            .truncate(self.base_depth);
        let _ = ACTIVE.try_with(|active| {
            let mut active = active.borrow_mut();
            if let Some(position) = active
                .iter()
                .rposition(|entered| Rc::ptr_eq(entered, &self.context.frames))
            {
                active.truncate(position);
            }
        });
    }
}

/// Guard for one pushed frame.
pub(crate) struct Scope {
    frames: Rc<RefCell<Frames>>,
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl Drop for Scope {
    fn drop(&mut self) {
        let mut frames = self.frames.borrow_mut();
        if frames.stack.len() == self.depth {
            frames.stack.pop();
        } else if !std::thread::panicking() {
            panic!(
                "execution context frames released out of order (expected depth {}, found {})",
                self.depth,
                frames.stack.len()
            );
        }
    }
}

fn active() -> Rc<RefCell<Frames>> {
    match ACTIVE.with_borrow(|active| active.last().cloned()) {
        Some(frames) => frames,
        None => panic!("generator evaluated outside of an execution context"),
    }
}

fn push(frame: Frame) -> Scope {
    let frames = active();
    let depth = {
        let mut inner = frames.borrow_mut();
        inner.stack.push(frame);
        inner.stack.len()
    };
    Scope {
        frames,
        depth,
        _not_send: PhantomData,
    }
}

/// Whether any context is active on this thread.
pub fn is_active() -> bool {
    ACTIVE.with_borrow(|active| !active.is_empty())
}

/// Whether picks are currently being recorded into a decision tree.
pub fn is_recording() -> bool {
    is_active() && current_node().is_some()
}

/// The size generators should currently aim for.
///
/// # Panics
///
/// Panics when called outside of an active context.
pub fn current_size() -> Size {
    let frames = active();
    let frames = frames.borrow();
    let size = frames.stack.iter().rev().find_map(|frame| match frame {
        Frame::Size(size) => Some(*size),
        _ => None,
    });
    size.unwrap_or_default()
}

/// Run `f` with the size overridden.
pub fn with_size<R>(size: Size, f: impl FnOnce() -> R) -> R {
    let _scope = push(Frame::Size(size));
    f()
}

/// Run `f` drawing randomness from `seed`.
pub fn with_random<R>(seed: Seed, f: impl FnOnce() -> R) -> R {
    let _scope = push(Frame::Random(seed));
    f()
}

/// Run `f` with recording suspended; nested picks produce directly.
pub(crate) fn without_recording<R>(f: impl FnOnce() -> R) -> R {
    let _scope = push(Frame::Sampling);
    f()
}

/// Run `f` with `node` of `tree` as the current node and `seed` as its
/// random source.
pub(crate) fn with_node<R>(
    tree: &SharedTree,
    node: NodeId,
    seed: Seed,
    f: impl FnOnce() -> R,
) -> R {
    let _node = push(Frame::Node(Rc::clone(tree), node));
    let _random = push(Frame::Random(seed));
    f()
}

/// The innermost decision-tree node, or `None` in sampling mode.
pub(crate) fn current_node() -> Option<(SharedTree, NodeId)> {
    let frames = active();
    let frames = frames.borrow();
    let node = frames.stack.iter().rev().find_map(|frame| match frame {
        Frame::Node(tree, node) => Some(Some((Rc::clone(tree), *node))),
        Frame::Sampling => Some(None),
        _ => None,
    });
    node.flatten()
}

/// Draw from the innermost random source and store its successor.
fn advance<R>(draw: impl FnOnce(Seed) -> (R, Seed)) -> R {
    let frames = active();
    let mut frames = frames.borrow_mut();
    let seed = frames.stack.iter_mut().rev().find_map(|frame| match frame {
        Frame::Random(seed) => Some(seed),
        _ => None,
    });
    match seed {
        Some(seed) => {
            let (value, next) = draw(*seed);
            *seed = next;
            value
        }
        None => panic!("execution context has no random source"),
    }
}

/// Draw a uniformly random `u64`.
pub fn next_u64() -> u64 {
    advance(Seed::next_u64)
}

/// Draw a random value in `[0, bound)`.
pub fn next_bounded(bound: u64) -> u64 {
    advance(|seed| seed.next_bounded(bound))
}

/// Draw a random bool.
pub fn next_bool() -> bool {
    advance(Seed::next_bool)
}

/// Split off an independent random source.
pub fn split_random() -> Seed {
    advance(|seed| {
        let (rest, child) = seed.split();
        (child, rest)
    })
}
