//! Evaluation of a single test case against its decision tree.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::context::{self, Context};
use crate::data::{Seed, Size};
use crate::error::{GenerationFailure, Result};
use crate::tree::{DecisionTree, SharedTree};

/// What a property body concluded about its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
    /// The input does not meet the property's preconditions.
    Discard,
}

impl From<bool> for Verdict {
    fn from(holds: bool) -> Self {
        if holds {
            Verdict::Pass
        } else {
            Verdict::Fail("condition returned false".to_string())
        }
    }
}

impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Verdict::Pass
    }
}

impl<E: Display> From<std::result::Result<(), E>> for Verdict {
    fn from(result: std::result::Result<(), E>) -> Self {
        match result {
            Ok(()) => Verdict::Pass,
            Err(error) => Verdict::Fail(error.to_string()),
        }
    }
}

/// A property body: picks its inputs and checks them.
pub type Body = Rc<dyn Fn() -> Result<Verdict>>;

/// Result of evaluating a test case once.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Passed,
    Failed(String),
    Discarded,
    /// A generator could not produce an input.
    GenerationFailed(GenerationFailure),
}

/// One test case: a body, the context it runs in and the decisions it made.
///
/// The first [`TestCase::run`] records the tree. Later runs replay it, which
/// is how the shrink search tries substituted values.
pub struct TestCase {
    context: Context,
    tree: SharedTree,
    body: Body,
    seed: Seed,
    size: Size,
}

impl TestCase {
    pub fn new(size: Size, seed: Seed, body: Body) -> Self {
        TestCase {
            context: Context::new(size, seed),
            tree: Rc::new(RefCell::new(DecisionTree::new(seed))),
            body,
            seed,
            size,
        }
    }

    /// Evaluate the body against the current tree.
    ///
    /// A panic inside the body is caught and reported as a failure.
    pub fn run(&self) -> CaseOutcome {
        let _entered = self.context.enter();
        let (root, seed) = {
            let mut tree = self.tree.borrow_mut();
            let root = tree.root();
            tree.begin(root);
            (root, tree.seed(root))
        };

        let body = &self.body;
        let result = context::with_node(&self.tree, root, seed, || {
            panic::catch_unwind(AssertUnwindSafe(|| body()))
        });
        self.tree.borrow_mut().settle();

        match result {
            Ok(Ok(Verdict::Pass)) => CaseOutcome::Passed,
            Ok(Ok(Verdict::Fail(reason))) => CaseOutcome::Failed(reason),
            Ok(Ok(Verdict::Discard)) => CaseOutcome::Discarded,
            Ok(Err(failure)) => CaseOutcome::GenerationFailed(failure),
            Err(payload) => CaseOutcome::Failed(panic_message(payload.as_ref())),
        }
    }

    pub fn tree(&self) -> Ref<'_, DecisionTree> {
        self.tree.borrow()
    }

    pub fn tree_mut(&self) -> RefMut<'_, DecisionTree> {
        self.tree.borrow_mut()
    }

    /// The recorded inputs, rendered and comma separated.
    pub fn counterexample(&self) -> String {
        self.tree().picks().join(", ")
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "test case panicked".to_string()
    }
}
