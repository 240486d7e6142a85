//! Decision tree replay properties
//!
//! Replaying a recorded test case must reproduce its values, and
//! substituting one node must leave every other recorded pick untouched.

use std::rc::Rc;

use crate::{arbitrary_seed, arbitrary_size, assert_passes};
use rosecheck::*;

fn three_inputs(size: Size, seed: Seed) -> TestCase {
    let items = Gen::vec_of(Gen::<(u8, bool)>::tuple_of(
        Gen::<u8>::range(0, 50),
        Gen::bool(),
    ));
    let number = Gen::<i32>::int_range(-100, 100);
    let label = Gen::option_of(Gen::ascii_string());
    TestCase::new(
        size,
        seed,
        Rc::new(move || {
            items.pick()?;
            number.pick()?;
            label.pick()?;
            Ok(Verdict::Pass)
        }),
    )
}

fn seeds(tree: &DecisionTree) -> Vec<Seed> {
    tree.preorder().into_iter().map(|node| tree.seed(node)).collect()
}

/// Property: replaying, with or without forced regeneration, reproduces
/// every recorded value and seed
pub fn test_replay_reproduces_recording() {
    let prop = for_all_named(
        Gen::<(Size, Seed)>::tuple_of(arbitrary_size(), arbitrary_seed()),
        "(size, seed)",
        |&(size, seed)| {
            let case = three_inputs(size, seed);
            case.run();
            let picks = case.tree().picks();
            let recorded_seeds = seeds(&case.tree());

            case.run();
            let replayed = case.tree().picks() == picks;

            case.tree_mut().invalidate();
            case.run();
            let regenerated =
                case.tree().picks() == picks && seeds(&case.tree()) == recorded_seeds;

            replayed && regenerated
        },
    );
    assert_passes(prop, 30);
}

/// Property: substituting the middle input leaves the other inputs and
/// their whole subtrees unchanged
pub fn test_substitution_leaves_siblings_untouched() {
    let prop = for_all_named(
        Gen::<(Size, Seed, i32)>::triple_of(
            arbitrary_size(),
            arbitrary_seed(),
            Gen::<i32>::int_range(-100, 100),
        ),
        "(size, seed, candidate)",
        |&(size, seed, candidate)| {
            let case = three_inputs(size, seed);
            case.run();
            let before = case.tree().picks();
            let before_seeds = seeds(&case.tree());

            let number = case.tree().children(case.tree().root())[1];
            if !case.tree_mut().replace_value(number, candidate) {
                return false;
            }
            case.run();

            let tree = case.tree();
            let after = tree.picks();
            after[0] == before[0]
                && after[1] == candidate.to_string()
                && after[2] == before[2]
                && seeds(&tree) == before_seeds
                && tree.is_substituted(number)
        },
    );
    assert_passes(prop, 30);
}
