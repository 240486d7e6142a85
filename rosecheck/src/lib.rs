//! rosecheck property-based testing library.
//!
//! This is the main entry point for rosecheck, providing a convenient API
//! for property-based testing in Rust.
//!
//! ```rust
//! use rosecheck::*;
//!
//! let prop = for_all(Gen::<i32>::int_range(0, 100), |&n| n <= 100);
//! assert!(prop.run(&Config::default()).is_pass());
//! ```

pub use rosecheck_core::*;

// Re-export derive macros when available
#[cfg(feature = "derive")]
pub use rosecheck_derive::*;
