//! Basic example demonstrating rosecheck property-based testing.

use rosecheck::*;

fn main() {
    println!("rosecheck Property-Based Testing Examples");
    println!();

    // Example 1: Simple boolean property
    println!("Testing boolean property: double negation is the identity");
    let bool_prop = for_all(Gen::bool(), |&b| !!b == b);
    println!("{}", bool_prop.run(&Config::default()));
    println!();

    // Example 2: A body picking several inputs
    println!("Testing integer property: addition commutes");
    let int_gen = Gen::<i32>::int_range(-100, 100);
    let addition_prop = property(move || {
        let a = int_gen.pick()?;
        let b = int_gen.pick()?;
        Ok(a + b == b + a)
    });
    println!("{}", addition_prop.run(&Config::default()));
    println!();

    // Example 3: Property that should fail (to demonstrate shrinking)
    println!("Testing property that should fail: all integers are positive");
    let positive_prop = for_all_named(Gen::<i32>::int_range(-10, 10), "x", |&x| x > 0);
    match positive_prop.run(&Config::default().with_tests(20)) {
        TestResult::Fail {
            counterexample,
            tests_run,
            shrinks_performed,
            ..
        } => {
            println!("Positive property failed as expected:");
            println!("  Counterexample: {counterexample}");
            println!("  Tests run: {tests_run}");
            println!("  Shrinks performed: {shrinks_performed}");
        }
        result => println!("Unexpected result: {result:?}"),
    }
    println!();

    // Example 4: Combining generators with map
    println!("Testing mapped generator: absolute value is always non-negative");
    let abs_gen = Gen::<i32>::int_range(-50, 50).map(|x| x.abs());
    let abs_prop = for_all(abs_gen, |&x| x >= 0);
    println!("{}", abs_prop.run(&Config::default()));
    println!();

    // Example 5: Sampling a generator outside of a property
    println!("Sampling a vector generator at size 10:");
    let vec_gen = Gen::vec_of(Gen::<u8>::range(0, 9));
    for seed in 0..3 {
        if let Err(failure) = sample(Size::new(10), Seed::from_u64(seed), &vec_gen) {
            println!("  {failure}");
        }
    }
}
