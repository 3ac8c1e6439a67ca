use crate::compiler::{CompileContext, ComparisonResolver, Predicate, Result};
use crate::template::FilterClause;

pub struct FilterResolver;

impl FilterResolver {
    /// Compile a filter tree depth first.
    pub fn compile(clause: &FilterClause, ctx: &CompileContext) -> Result<Predicate> {
        match clause {
            FilterClause::Comparison(cmp) => ComparisonResolver::compile(cmp, ctx),
            FilterClause::And(children) => Ok(Predicate::And(Self::compile_children(children, ctx)?)),
            FilterClause::Or(children) => Ok(Predicate::Or(Self::compile_children(children, ctx)?)),
        }
    }

    /// The top-level filter list is an implicit conjunction.
    pub fn compile_all(filters: &[FilterClause], ctx: &CompileContext) -> Result<Option<Predicate>> {
        if filters.is_empty() {
            return Ok(None);
        }
        Ok(Some(Predicate::conjoin(Self::compile_children(filters, ctx)?)))
    }

    fn compile_children(children: &[FilterClause], ctx: &CompileContext) -> Result<Vec<Predicate>> {
        children.iter().map(|c| Self::compile(c, ctx)).collect()
    }
}
