//! Core functionality for rosecheck property-based testing.
//!
//! This crate provides the fundamental building blocks: generators that
//! draw size and randomness from an implicit execution context, decision
//! trees recording every pick of a test case, and the shrink search that
//! minimizes a failing case by substituting values into its tree.

pub mod case;
pub mod context;
pub mod data;
pub mod error;
pub mod gen;
pub mod property;
pub mod sample;
pub mod search;
pub mod shrink;
pub mod tree;

// Re-export the main types
pub use case::*;
pub use data::*;
pub use error::*;
pub use gen::*;
pub use property::*;
pub use sample::*;
pub use search::*;
pub use tree::{nodes_created, DecisionTree, NodeId};
