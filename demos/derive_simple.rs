//! Simple example demonstrating `#[derive(Arbitrary)]`.

use rosecheck::*;

#[derive(Arbitrary, Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: u8,
    email: Option<String>,
}

#[derive(Arbitrary, Debug, Clone, PartialEq)]
enum Shape {
    Circle(u16),
    Rectangle { width: u16, height: u16 },
    Point,
}

fn main() {
    println!("Derive Arbitrary Example");
    println!("========================");
    println!();

    println!("Sample people:");
    let people = samples(3, Size::new(8), Seed::from_u64(7), &Person::arbitrary());
    match people {
        Ok(people) => people.iter().for_each(|person| println!("  {person:?}")),
        Err(failure) => println!("  {failure}"),
    }
    println!();

    println!("Testing that every shape has a small area (fails and shrinks):");
    let prop = for_all_named(Shape::arbitrary(), "shape", |shape| match shape {
        Shape::Circle(r) => u32::from(*r) < 30,
        Shape::Rectangle { width, height } => u32::from(*width) * u32::from(*height) < 500,
        Shape::Point => true,
    });
    println!("{}", prop.run(&Config::default()));
}
