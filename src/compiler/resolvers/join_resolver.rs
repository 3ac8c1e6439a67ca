use crate::compiler::{CompileContext, ComparisonResolver, Predicate, ResolvedTable, Result};
use crate::template::JoinClause;

/// One join step: the table brought in and the condition it is joined on.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledJoin {
    pub table: ResolvedTable,
    pub on: Predicate,
}

pub struct JoinResolver;

impl JoinResolver {
    /// The `by` list is conjunctive; an empty list joins every row pair.
    pub fn compile(join: &JoinClause, ctx: &CompileContext) -> Result<CompiledJoin> {
        let table = ctx.table(&join.table)?.clone();
        let conditions = join.by.iter().map(|c| ComparisonResolver::compile(c, ctx)).collect::<Result<Vec<_>>>()?;
        Ok(CompiledJoin { table, on: Predicate::conjoin(conditions) })
    }
}
