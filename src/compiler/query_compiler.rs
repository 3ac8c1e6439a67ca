use std::collections::HashSet;

use tracing::debug;

use crate::compiler::{
    AggregateCall, ColumnRef, CompileContext, CompiledJoin, CompiledQuery, FilterResolver, GroupByResolver,
    JoinResolver, OutputColumn, OutputNamer, ProjectionResolver, ProjectionUnit, QueryError, Result, ScalarCall,
    ScalarExpr, TableResolver,
};
use crate::context::EngineContext;
use crate::functions::FunctionImpl;
use crate::template::QueryTemplate;

pub struct QueryCompiler;

impl QueryCompiler {
    pub fn compile(template: &QueryTemplate, engine: &EngineContext) -> Result<CompiledQuery> {
        let tables = TableResolver::resolve(&template.table_references(), engine)?;
        if tables.is_empty() {
            return Err(QueryError::validation("template does not reference any table"));
        }
        let ctx = CompileContext::new(tables, engine.functions);

        let units = ProjectionResolver::compile(&template.select, &ctx)?;
        let (from, joins) = Self::compile_sources(template, &ctx)?;
        let criteria = FilterResolver::compile_all(template.filters(), &ctx)?;
        let group_by = match &template.group_by {
            Some(g) => GroupByResolver::compile(g, &ctx)?,
            None => Vec::new(),
        };

        let is_aggregate = template.group_by.is_some()
            || units.iter().any(|u| matches!(u, ProjectionUnit::Calculated(c) if c.func.is_aggregate()));
        let (projection, aggregates) = Self::build_projection(units, &group_by, is_aggregate)?;

        debug!(
            from = ?from.iter().map(|t| t.key.as_str()).collect::<Vec<_>>(),
            joins = joins.len(),
            filtered = criteria.is_some(),
            group_keys = group_by.len(),
            columns = projection.len(),
            "compiled query template"
        );

        Ok(CompiledQuery { from, joins, criteria, group_by, aggregates, projection, is_aggregate })
    }

    /// Split the declared tables into the base relation and the join chain.
    fn compile_sources(
        template: &QueryTemplate,
        ctx: &CompileContext,
    ) -> Result<(Vec<crate::compiler::ResolvedTable>, Vec<CompiledJoin>)> {
        let mut targets: HashSet<&str> = HashSet::new();
        for join in template.joins() {
            if !targets.insert(join.table.key()) {
                return Err(QueryError::Validation(format!("table '{}' is joined more than once", join.table.key())));
            }
        }

        let from: Vec<_> = ctx.tables().filter(|t| !targets.contains(t.key.as_str())).cloned().collect();
        if from.is_empty() {
            return Err(QueryError::validation("every table is a join target; there is nothing to join onto"));
        }

        let mut visible: HashSet<String> = from.iter().map(|t| t.key.clone()).collect();
        let mut joins = Vec::with_capacity(template.joins().len());
        for join in template.joins() {
            let compiled = JoinResolver::compile(join, ctx)?;
            visible.insert(compiled.table.key.clone());
            if let Some(early) = compiled.on.columns().into_iter().find(|c| !visible.contains(&c.table)) {
                return Err(QueryError::Validation(format!(
                    "join of '{}' references '{}' before it is joined",
                    compiled.table.key, early.table
                )));
            }
            joins.push(compiled);
        }
        Ok((from, joins))
    }

    fn build_projection(
        units: Vec<ProjectionUnit>,
        group_by: &[ColumnRef],
        is_aggregate: bool,
    ) -> Result<(Vec<OutputColumn>, Vec<AggregateCall>)> {
        let grouped: HashSet<String> = group_by.iter().map(|c| c.qualified()).collect();
        let check_grouped = |c: &ColumnRef| -> Result<()> {
            if is_aggregate && !grouped.contains(&c.qualified()) {
                return Err(QueryError::Validation(format!(
                    "column '{}' must appear in group_by or be used in an aggregate function",
                    c.qualified()
                )));
            }
            Ok(())
        };

        let mut namer = OutputNamer::default();
        let mut projection = Vec::new();
        let mut aggregates = Vec::new();

        for unit in units {
            match unit {
                ProjectionUnit::Column(c) => {
                    check_grouped(&c)?;
                    projection.push(OutputColumn { name: namer.column(&c), expr: ScalarExpr::Column(c) });
                }
                ProjectionUnit::AllColumns { columns, .. } => {
                    for c in columns {
                        check_grouped(&c)?;
                        projection.push(OutputColumn { name: namer.column(&c), expr: ScalarExpr::Column(c) });
                    }
                }
                ProjectionUnit::Calculated(calc) => {
                    let name = namer.calculated(&calc.base_name());
                    let expr = match calc.func {
                        FunctionImpl::Aggregate(func) => {
                            let slot = format!("#agg{}", aggregates.len());
                            aggregates.push(AggregateCall { slot: slot.clone(), func, args: calc.args });
                            ScalarExpr::Slot(slot)
                        }
                        FunctionImpl::Scalar(func) => {
                            let call = ScalarExpr::Call(ScalarCall { func, args: calc.args });
                            call.columns().into_iter().try_for_each(check_grouped)?;
                            call
                        }
                    };
                    projection.push(OutputColumn { name, expr });
                }
            }
        }
        Ok((projection, aggregates))
    }
}
