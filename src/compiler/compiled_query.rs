use std::{fmt, sync::Arc};

use crate::compiler::{ColumnRef, CompiledJoin, Predicate, ResolvedTable, ScalarExpr};
use crate::functions::AggregateImpl;

/// One aggregate evaluated per group; its result lands in the row under `slot`.
#[derive(Clone)]
pub struct AggregateCall {
    pub slot: String,
    pub func: Arc<dyn AggregateImpl>,
    pub args: Vec<ScalarExpr>,
}

impl fmt::Debug for AggregateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateCall")
            .field("slot", &self.slot)
            .field("func", &self.func.name())
            .field("args", &self.args)
            .finish()
    }
}

impl PartialEq for AggregateCall {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.func.name() == other.func.name() && self.args == other.args
    }
}

/// A field of the output record.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputColumn {
    pub name: String,
    pub expr: ScalarExpr,
}

/// A template with every name bound and every clause compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Tables crossed to form the base relation.
    pub from: Vec<ResolvedTable>,
    pub joins: Vec<CompiledJoin>,
    pub criteria: Option<Predicate>,
    pub group_by: Vec<ColumnRef>,
    pub aggregates: Vec<AggregateCall>,
    pub projection: Vec<OutputColumn>,
    pub is_aggregate: bool,
}

impl CompiledQuery {
    pub fn column_names(&self) -> Vec<String> {
        self.projection.iter().map(|c| c.name.clone()).collect()
    }
}
