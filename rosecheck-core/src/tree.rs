//! Decision trees recording every pick made while evaluating a test case.
//!
//! A [`DecisionTree`] is an arena of nodes addressed by [`NodeId`]. Node 0
//! is the root and stands for the test case itself; every other node is one
//! [`Gen::pick`] made while a tree frame was active. A node keeps the seed
//! its generator drew from, the value it produced and its own picks as
//! children in invocation order.
//!
//! Replaying a tree re-runs the test case body. A pick that reaches an
//! existing child either returns the recorded value (untouched or
//! substituted) or, when the child is stale because something below it was
//! substituted, re-runs its generator from the recorded seed.

pub mod render;

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

use crate::context;
use crate::data::Seed;
use crate::error::Result;
use crate::gen::Gen;
use crate::sample;
use crate::shrink::{self, Shrinks};

pub(crate) type SharedTree = Rc<RefCell<DecisionTree>>;

thread_local! {
    static NODES_CREATED: Cell<u64> = const { Cell::new(0) };
}

/// Number of decision-tree nodes created on this thread so far.
pub fn nodes_created() -> u64 {
    NODES_CREATED.with(Cell::get)
}

/// Index of a node in a [`DecisionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The operations the shrink search needs from the generator of a node,
/// without knowing the generated type.
pub(crate) trait ErasedGenerator {
    fn shrink_any(&self, value: &dyn Any) -> Shrinks<Rc<dyn Any>>;
    fn render_any(&self, value: &dyn Any) -> String;
}

impl<T: Clone + Debug + 'static> ErasedGenerator for Gen<T> {
    fn shrink_any(&self, value: &dyn Any) -> Shrinks<Rc<dyn Any>> {
        match value.downcast_ref::<T>() {
            Some(value) => Box::new(
                self.shrink(value.clone())
                    .map(|candidate| Rc::new(candidate) as Rc<dyn Any>),
            ),
            None => shrink::nothing(),
        }
    }

    fn render_any(&self, value: &dyn Any) -> String {
        match value.downcast_ref::<T>() {
            Some(value) => sample::render(value),
            None => "<mismatched value>".to_string(),
        }
    }
}

#[derive(Clone)]
struct Node {
    parent: Option<NodeId>,
    generator: Option<Rc<dyn ErasedGenerator>>,
    /// Address of the generator the value was produced by.
    identity: *const (),
    type_id: Option<TypeId>,
    seed: Seed,
    value: Option<Rc<dyn Any>>,
    children: Vec<NodeId>,
    /// Picks made during the current or last evaluation of this node.
    cursor: usize,
    substituted: bool,
    /// Value may no longer match what the generator would produce.
    stale: bool,
    /// Evaluation started and has not finished yet.
    open: bool,
    /// An earlier pick changed; a substituted value only stands if the same
    /// generator asks for it again.
    revalidate: bool,
}

impl Node {
    fn new(parent: Option<NodeId>, seed: Seed) -> Self {
        NODES_CREATED.with(|count| count.set(count.get() + 1));
        Node {
            parent,
            generator: None,
            identity: std::ptr::null(),
            type_id: None,
            seed,
            value: None,
            children: Vec::new(),
            cursor: 0,
            substituted: false,
            stale: true,
            open: false,
            revalidate: false,
        }
    }
}

/// How a pick can be served from what is already recorded.
enum Reuse<T> {
    Value(T),
    Rerun(NodeId),
    Fresh,
}

/// The record of one test case's generation decisions.
#[derive(Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Create a tree holding only the root, which draws from `seed`.
    pub fn new(seed: Seed) -> Self {
        DecisionTree {
            nodes: vec![Node::new(None, seed)],
        }
    }

    /// The root node, standing for the test case body.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.preorder().len()
    }

    /// Children of `node` in pick order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Parent of `node`; `None` for the root.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Seed the node's generator draws from.
    pub fn seed(&self, node: NodeId) -> Seed {
        self.nodes[node.0].seed
    }

    /// The recorded value of `node`, if it has one of type `T`.
    pub fn value<T: Clone + 'static>(&self, node: NodeId) -> Option<T> {
        self.nodes[node.0]
            .value
            .as_ref()?
            .downcast_ref::<T>()
            .cloned()
    }

    /// Whether `node` holds a value supplied by the shrink search.
    pub fn is_substituted(&self, node: NodeId) -> bool {
        self.nodes[node.0].substituted
    }

    /// The recorded value of `node`, rendered.
    pub fn render_value(&self, node: NodeId) -> String {
        let node = &self.nodes[node.0];
        match (&node.generator, &node.value) {
            (Some(generator), Some(value)) => generator.render_any(&**value),
            _ => "<unevaluated>".to_string(),
        }
    }

    /// Rendered values of the test case's top-level picks.
    pub fn picks(&self) -> Vec<String> {
        self.children(self.root())
            .iter()
            .map(|&child| self.render_value(child))
            .collect()
    }

    /// Reachable nodes, parents before children, siblings in pick order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        order
    }

    /// Substitute `candidate` as the value of `node`.
    ///
    /// The node's children are discarded and later replays return
    /// `candidate` without running the generator. Every ancestor becomes
    /// stale so that it is re-run around the new value. Picks made after
    /// `node` keep substituted values only while their generator is the one
    /// that recorded them; otherwise they are re-run from their recorded
    /// seeds, since their generator may depend on `candidate`. Returns `false`, leaving
    /// the tree untouched, when `node` was not produced by a `Gen<T>`.
    pub fn replace_value<T: 'static>(&mut self, node: NodeId, candidate: T) -> bool {
        if self.nodes[node.0].type_id != Some(TypeId::of::<T>()) {
            return false;
        }
        self.replace_value_any(node, Rc::new(candidate));
        true
    }

    pub(crate) fn replace_value_any(&mut self, node: NodeId, candidate: Rc<dyn Any>) {
        let target = &mut self.nodes[node.0];
        target.value = Some(candidate);
        target.children.clear();
        target.cursor = 0;
        target.substituted = true;
        target.stale = false;
        target.revalidate = false;

        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent {
            let siblings = &self.nodes[parent.0].children;
            let later = siblings
                .iter()
                .position(|&child| child == current)
                .map_or(Vec::new(), |position| siblings[position + 1..].to_vec());
            for sibling in later {
                self.mark_revalidate(sibling);
            }
            self.nodes[parent.0].stale = true;
            current = parent;
        }
    }

    fn mark_revalidate(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.revalidate = true;
            stack.extend(node.children.iter().copied());
        }
    }

    /// Shrink candidates for the value of `node`, or `None` when the node
    /// has no generator or no value.
    pub(crate) fn candidates(&self, node: NodeId) -> Option<Shrinks<Rc<dyn Any>>> {
        let node = &self.nodes[node.0];
        let generator = node.generator.as_ref()?;
        let value = node.value.as_ref()?;
        Some(generator.shrink_any(&**value))
    }

    /// Force every node that was not substituted to be regenerated from its
    /// recorded seed on the next replay.
    pub fn invalidate(&mut self) {
        for node in &mut self.nodes {
            if !node.substituted {
                node.stale = true;
            }
        }
    }

    /// Rebuild the arena with only the reachable nodes, in pre-order.
    pub fn compact(&mut self) {
        let order = self.preorder();
        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new, old) in order.iter().enumerate() {
            remap[old.0] = new;
        }
        let nodes = order
            .iter()
            .map(|old| {
                let mut node = self.nodes[old.0].clone();
                node.parent = node.parent.map(|parent| NodeId(remap[parent.0]));
                for child in &mut node.children {
                    *child = NodeId(remap[child.0]);
                }
                node
            })
            .collect();
        self.nodes = nodes;
    }

    /// Start (re-)evaluating `node`.
    pub(crate) fn begin(&mut self, node: NodeId) {
        let node = &mut self.nodes[node.0];
        node.cursor = 0;
        node.stale = true;
        node.open = true;
    }

    /// Close every node left open by an evaluation that did not finish, dropping
    /// children it did not reach this time.
    pub(crate) fn settle(&mut self) {
        for node in &mut self.nodes {
            if node.open {
                node.children.truncate(node.cursor);
                node.open = false;
            }
            node.revalidate = false;
        }
    }

    fn finish<T: Clone + Debug + 'static>(&mut self, node: NodeId, value: T, gen: &Gen<T>) {
        let node = &mut self.nodes[node.0];
        node.children.truncate(node.cursor);
        node.value = Some(Rc::new(value));
        node.generator = Some(Rc::new(gen.clone()));
        node.identity = gen.identity();
        node.substituted = false;
        node.stale = false;
        node.open = false;
    }

    fn next_index(&mut self, parent: NodeId) -> usize {
        let parent = &mut self.nodes[parent.0];
        parent.cursor += 1;
        parent.cursor - 1
    }

    fn reuse<T: Clone + 'static>(&self, parent: NodeId, index: usize, gen: &Gen<T>) -> Reuse<T> {
        let Some(&child) = self.children(parent).get(index) else {
            return Reuse::Fresh;
        };
        let node = &self.nodes[child.0];
        if node.type_id != Some(TypeId::of::<T>()) {
            return Reuse::Fresh;
        }
        // A substituted value survives a rebuilt generator unless an earlier
        // pick changed since; an ordinary value only lives as long as the
        // generator that made it.
        let same_generator = node.identity == gen.identity();
        let keep = if node.substituted {
            same_generator || !node.revalidate
        } else {
            !node.stale && same_generator
        };
        match self.value::<T>(child) {
            Some(value) if keep => Reuse::Value(value),
            _ => Reuse::Rerun(child),
        }
    }

    fn record<T: Clone + Debug + 'static>(
        &mut self,
        parent: NodeId,
        index: usize,
        gen: &Gen<T>,
        seed: Seed,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(Some(parent), seed);
        node.generator = Some(Rc::new(gen.clone()));
        node.identity = gen.identity();
        node.type_id = Some(TypeId::of::<T>());
        self.nodes.push(node);

        let children = &mut self.nodes[parent.0].children;
        if index < children.len() {
            children[index] = id;
        } else {
            children.push(id);
        }
        id
    }
}

/// Pick a value from `gen` as the next child of `parent`.
pub(crate) fn pick<T: Clone + Debug + 'static>(
    tree: &SharedTree,
    parent: NodeId,
    gen: &Gen<T>,
) -> Result<T> {
    // Split unconditionally so the parent's stream does not depend on
    // which children were reused.
    let fresh_seed = context::split_random();
    let (node, seed) = {
        let mut arena = tree.borrow_mut();
        let index = arena.next_index(parent);
        let node = match arena.reuse(parent, index, gen) {
            Reuse::Value(value) => return Ok(value),
            Reuse::Rerun(node) => node,
            Reuse::Fresh => arena.record(parent, index, gen, fresh_seed),
        };
        arena.begin(node);
        (node, arena.seed(node))
    };

    let value = context::with_node(tree, node, seed, || gen.produce())?;
    tree.borrow_mut().finish(node, value.clone(), gen);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{CaseOutcome, TestCase, Verdict};
    use crate::data::Size;
    use std::rc::Rc;

    fn pair_case(seed: u64) -> TestCase {
        let pair = Gen::<(i32, i32)>::tuple_of(
            Gen::<i32>::int_range(0, 100),
            Gen::<i32>::int_range(0, 100),
        );
        TestCase::new(
            Size::new(50),
            Seed::from_u64(seed),
            Rc::new(move || {
                let (a, b) = pair.pick()?;
                Ok(Verdict::from(a + b < 1000))
            }),
        )
    }

    fn snapshot(tree: &DecisionTree) -> Vec<(Option<(i32, i32)>, Option<i32>, Seed)> {
        tree.preorder()
            .into_iter()
            .map(|node| (tree.value(node), tree.value(node), tree.seed(node)))
            .collect()
    }

    #[test]
    fn test_recording_builds_nested_nodes() {
        let case = pair_case(1);
        assert_eq!(case.run(), CaseOutcome::Passed);

        let tree = case.tree();
        let root = tree.root();
        assert_eq!(tree.children(root).len(), 1);
        let pair_node = tree.children(root)[0];
        assert_eq!(tree.children(pair_node).len(), 2);
        assert_eq!(tree.parent(pair_node), Some(root));

        let (a, b) = tree.value::<(i32, i32)>(pair_node).unwrap();
        assert_eq!(tree.value::<i32>(tree.children(pair_node)[0]), Some(a));
        assert_eq!(tree.value::<i32>(tree.children(pair_node)[1]), Some(b));
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_replay_without_substitution_reproduces_values() {
        let case = pair_case(2);
        case.run();
        let before = snapshot(&case.tree());

        case.run();
        assert_eq!(snapshot(&case.tree()), before);

        // Regenerating everything from the recorded seeds gives the same values.
        case.tree_mut().invalidate();
        case.run();
        assert_eq!(snapshot(&case.tree()), before);
    }

    #[test]
    fn test_substitution_leaves_siblings_untouched() {
        let case = pair_case(3);
        case.run();

        let (pair_node, a_node, b_node) = {
            let tree = case.tree();
            let pair_node = tree.children(tree.root())[0];
            let children = tree.children(pair_node).to_vec();
            (pair_node, children[0], children[1])
        };
        let b_before = (case.tree().value::<i32>(b_node), case.tree().seed(b_node));

        assert!(case.tree_mut().replace_value(a_node, 0i32));
        case.run();

        let tree = case.tree();
        assert!(tree.is_substituted(a_node));
        assert_eq!(tree.value::<i32>(a_node), Some(0));
        assert_eq!((tree.value::<i32>(b_node), tree.seed(b_node)), b_before);
        assert_eq!(tree.value::<(i32, i32)>(pair_node).map(|(a, _)| a), Some(0));
    }

    #[test]
    fn test_substitution_reruns_later_dependent_picks() {
        let case = TestCase::new(
            Size::NOMINAL,
            Seed::from_u64(7),
            Rc::new(|| {
                let n = Gen::<i32>::int_range(0, 100).pick()?;
                let m = Gen::<i32>::int_range(0, n).pick()?;
                Ok(Verdict::from(m <= n))
            }),
        );
        case.run();
        let (n_node, m_node) = {
            let tree = case.tree();
            let picks = tree.children(tree.root());
            (picks[0], picks[1])
        };

        assert!(case.tree_mut().replace_value(n_node, 100i32));
        assert_eq!(case.run(), CaseOutcome::Passed);
        assert!(case.tree_mut().replace_value(m_node, 60i32));
        assert_eq!(case.run(), CaseOutcome::Passed);
        assert_eq!(case.tree().value::<i32>(m_node), Some(60));

        // m's range now ends at 10, so 60 can no longer stand.
        assert!(case.tree_mut().replace_value(n_node, 10i32));
        assert_eq!(case.run(), CaseOutcome::Passed);
        let tree = case.tree();
        assert!(!tree.is_substituted(m_node));
        assert!(tree
            .value::<i32>(m_node)
            .is_some_and(|m| (0..=10).contains(&m)));
    }

    #[test]
    fn test_later_substitution_survives_with_same_generator() {
        let case = pair_case(8);
        case.run();
        let (a_node, b_node) = {
            let tree = case.tree();
            let pair_node = tree.children(tree.root())[0];
            (tree.children(pair_node)[0], tree.children(pair_node)[1])
        };
        assert!(case.tree_mut().replace_value(b_node, 6i32));
        case.run();
        assert!(case.tree_mut().replace_value(a_node, 7i32));
        case.run();

        assert_eq!(case.tree().picks(), vec!["(7, 6)".to_string()]);
        assert!(case.tree().is_substituted(b_node));
    }

    #[test]
    fn test_replace_value_rejects_wrong_type() {
        let case = pair_case(4);
        case.run();
        let pair_node = case.tree().children(case.tree().root())[0];
        assert!(!case.tree_mut().replace_value(pair_node, 5u8));
        assert!(!case.tree().is_substituted(pair_node));
    }

    #[test]
    fn test_compact_drops_unreachable_nodes() {
        let case = pair_case(5);
        case.run();
        let pair_node = case.tree().children(case.tree().root())[0];
        case.tree_mut().replace_value(pair_node, (1i32, 2i32));
        case.run();

        let mut tree = case.tree_mut();
        assert_eq!(tree.node_count(), 2);
        tree.compact();
        assert_eq!(tree.preorder(), vec![NodeId(0), NodeId(1)]);
        assert_eq!(tree.value::<(i32, i32)>(NodeId(1)), Some((1, 2)));
        assert_eq!(tree.picks(), vec!["(1, 2)".to_string()]);
    }

    #[test]
    fn test_node_creation_counter() {
        let before = nodes_created();
        let case = pair_case(6);
        case.run();
        // root, pair, two ints
        assert_eq!(nodes_created() - before, 4);
    }
}
