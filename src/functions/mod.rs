//! The closed set of functions available to calculated columns.

pub mod accumulator;
pub use accumulator::*;

pub mod function_impl;
pub use function_impl::*;

pub mod function_registry;
pub use function_registry::*;

pub mod aggregates;
pub use aggregates::*;

pub mod scalars;
pub use scalars::*;
