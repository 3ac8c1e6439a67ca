use crate::compiler::{AggregateCall, ColumnRef, OutputColumn, Predicate};

#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    /// Scan a single collection (backing table) under its visible key (alias or table name).
    Scan {
        backing: String,
        visible: String,
    },

    /// Inner join; a constant-true condition is a cross product.
    Join {
        left: Box<LogicalPlan>,
        right: Box<LogicalPlan>,
        on: Predicate,
    },

    Filter {
        input: Box<LogicalPlan>,
        predicate: Predicate,
    },

    /// Group-by aggregation. Output rows carry the group keys under their
    /// qualified names and each aggregate under its slot.
    Aggregate {
        input: Box<LogicalPlan>,
        group_keys: Vec<ColumnRef>,
        aggs: Vec<AggregateCall>,
    },

    /// Build the output records in declared order.
    Project {
        input: Box<LogicalPlan>,
        columns: Vec<OutputColumn>,
    },
}
