//! Serde model of a query template, as stored on a query interface.

pub mod table_reference;
pub use table_reference::*;

pub mod argument;
pub use argument::*;

pub mod comparator_op;
pub use comparator_op::*;

pub mod comparison;
pub use comparison::*;

pub mod filter_clause;
pub use filter_clause::*;

pub mod select_clause;
pub use select_clause::*;

pub mod join_clause;
pub use join_clause::*;

pub mod group_by_clause;
pub use group_by_clause::*;

pub mod query_template;
pub use query_template::*;
