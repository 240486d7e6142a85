//! Demo of decision tree recording, substitution and rendering.

use std::rc::Rc;

use rosecheck::*;

fn main() {
    println!("Decision Tree Demo");
    println!("==================");
    println!();

    let point = Gen::<(i32, i32)>::tuple_of(
        Gen::<i32>::int_range(0, 100),
        Gen::<i32>::int_range(0, 100),
    );
    let tags = Gen::vec_of(Gen::<u8>::range(0, 9));

    let case = TestCase::new(
        Size::new(5),
        Seed::from_u64(42),
        Rc::new(move || {
            let (x, y) = point.pick()?;
            let tags = tags.pick()?;
            Ok(Verdict::from(x + y < 100 || tags.is_empty()))
        }),
    );

    // Example 1: The recorded tree
    println!("1. Recorded tree ({:?})", case.run());
    print!("{}", case.tree().render());
    println!("Compact: {}", case.tree().render_compact());
    println!("Nodes created so far: {}", nodes_created());
    println!();

    // Example 2: Substituting a value and replaying
    println!("2. After substituting the first coordinate with 0");
    let first = {
        let tree = case.tree();
        let point_node = tree.children(tree.root())[0];
        tree.children(point_node)[0]
    };
    case.tree_mut().replace_value(first, 0i32);
    println!("Outcome: {:?}", case.run());
    print!("{}", case.tree().render());
    println!();

    // Example 3: Shrinking a failing case
    println!("3. Shrinking");
    let failing = (0..)
        .map(|seed| {
            let gen = Gen::vec_of(Gen::<i32>::int_range(0, 100));
            TestCase::new(
                Size::new(20),
                Seed::from_u64(seed),
                Rc::new(move || Ok(Verdict::from(gen.pick()?.iter().sum::<i32>() < 150))),
            )
        })
        .find(|case| matches!(case.run(), CaseOutcome::Failed(_)));

    if let Some(case) = failing {
        println!("Original: {}", case.counterexample());
        let shrunk = ShrinkSearch::new(&case).run("sum too large".to_string());
        for (step, counterexample) in shrunk.steps.iter().enumerate() {
            println!("  step {}: {}", step + 1, counterexample);
        }
        println!(
            "Minimal: {} after {} shrinks and {} attempts",
            case.counterexample(),
            shrunk.shrinks,
            shrunk.attempts
        );
        print!("{}", case.tree().render());
    }
}
