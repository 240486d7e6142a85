//! Example demonstrating how failures shrink through recorded picks.

use rosecheck::*;

fn main() {
    println!("Testing shrinking strategies");
    println!();

    // Integer shrinking: should shrink to the smallest failing value
    println!("Testing integer shrinking (values below 50 pass)");
    let int_prop = for_all_named(Gen::<i32>::int_range(0, 100), "n", |&n| n < 50);
    println!("{}", int_prop.run(&Config::default()));
    println!();

    // Independent inputs shrink independently
    println!("Testing pair shrinking (sums below 10 pass)");
    let digits = Gen::<i32>::int_range(0, 100);
    let pair_prop = property(move || {
        let a = digits.pick()?;
        let b = digits.pick()?;
        Ok(a + b < 10)
    });
    println!("{}", pair_prop.run(&Config::default()));
    println!();

    // Vector shrinking: should remove elements and shrink individual elements
    println!("Testing vector shrinking (vectors without a value over 40 pass)");
    let vec_gen = Gen::vec_of(Gen::<i32>::int_range(10, 100));
    let vec_prop = for_all(vec_gen, |v: &Vec<i32>| v.iter().all(|&x| x <= 40));
    println!("{}", vec_prop.run(&Config::default()));
    println!();

    // String shrinking: should simplify characters and remove them
    println!("Testing string shrinking (strings without 'z' pass)");
    let string_prop = for_all(Gen::ascii_string(), |s: &String| !s.contains('z'));
    println!("{}", string_prop.run(&Config::default()));
    println!();

    // Option shrinking: should shrink to the simplest Some
    println!("Testing Option shrinking (None and small values pass)");
    let option_gen = Gen::option_of(Gen::<u32>::range(0, 1000));
    let option_prop = for_all(option_gen, |opt: &Option<u32>| opt.map_or(true, |x| x < 100));
    println!("{}", option_prop.run(&Config::default()));
}
