use tracing::debug;

use crate::compiler::{CompiledQuery, Predicate, QueryCompiler, QueryError, Result, Truth};
use crate::context::EngineContext;
use crate::planner::LogicalPlan;
use crate::template::QueryTemplate;

/// An assembled, not yet materialized query.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    root: LogicalPlan,
    columns: Vec<String>,
}

impl Plan {
    /// The unpaginated plan; pages are cut from its result.
    pub fn root(&self) -> &LogicalPlan {
        &self.root
    }

    /// Output field names in record order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

pub struct PlanBuilder;

impl PlanBuilder {
    /// Compile a template against the live schema and lay out its plan.
    pub fn assemble(template: &QueryTemplate, engine: &EngineContext) -> Result<Plan> {
        let compiled = QueryCompiler::compile(template, engine)?;
        let root = Self::from_compiled(&compiled)?;
        Ok(Plan { root, columns: compiled.column_names() })
    }

    pub fn from_compiled(cq: &CompiledQuery) -> Result<LogicalPlan> {
        // base relation: cross product of every table that is not a join target
        let mut scans = cq.from.iter().map(|t| LogicalPlan::Scan {
            backing: t.name().to_string(),
            visible: t.key.clone(),
        });
        let mut plan = scans.next().ok_or_else(|| QueryError::validation("query has no base table"))?;
        for right in scans {
            plan = LogicalPlan::Join {
                left: Box::new(plan),
                right: Box::new(right),
                on: Predicate::Const3(Truth::True),
            };
        }

        // joins in declaration order, each against the accumulated relation
        for j in &cq.joins {
            let right = LogicalPlan::Scan { backing: j.table.name().to_string(), visible: j.table.key.clone() };
            plan = LogicalPlan::Join { left: Box::new(plan), right: Box::new(right), on: j.on.clone() };
        }

        if let Some(pred) = &cq.criteria {
            plan = LogicalPlan::Filter { input: Box::new(plan), predicate: pred.clone() };
        }

        if cq.is_aggregate {
            plan = LogicalPlan::Aggregate {
                input: Box::new(plan),
                group_keys: cq.group_by.clone(),
                aggs: cq.aggregates.clone(),
            };
        }

        plan = LogicalPlan::Project { input: Box::new(plan), columns: cq.projection.clone() };
        debug!(columns = cq.projection.len(), aggregate = cq.is_aggregate, "planned query");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_template_json, Harness};
    use serde_json::json;

    fn assemble(h: &Harness, raw: serde_json::Value) -> Result<Plan> {
        PlanBuilder::assemble(&QueryTemplate::parse(&raw)?, &h.engine())
    }

    #[test]
    fn sample_plan_has_joins_filter_aggregate_and_project() {
        let h = Harness::seeded();
        let plan = assemble(&h, sample_template_json()).unwrap();
        assert_eq!(plan.columns(), ["full_name", "email", "num_groups"]);

        let LogicalPlan::Project { input, .. } = plan.root() else { panic!("expected Project") };
        let LogicalPlan::Aggregate { input, group_keys, aggs } = input.as_ref() else { panic!("expected Aggregate") };
        assert_eq!(group_keys.len(), 2);
        assert_eq!(aggs.len(), 1);
        let LogicalPlan::Filter { input, .. } = input.as_ref() else { panic!("expected Filter") };
        let LogicalPlan::Join { left, right, .. } = input.as_ref() else { panic!("expected Join") };
        assert_eq!(
            right.as_ref(),
            &LogicalPlan::Scan { backing: "user_group".into(), visible: "user_group".into() }
        );
        let LogicalPlan::Join { left, .. } = left.as_ref() else { panic!("expected Join") };
        assert_eq!(left.as_ref(), &LogicalPlan::Scan { backing: "user".into(), visible: "monkey".into() });
    }

    #[test]
    fn plain_query_is_a_projection_over_a_scan() {
        let h = Harness::seeded();
        let plan = assemble(&h, json!({"select": {"columns": [{"table": {"name": "user"}, "column": "*"}]}})).unwrap();
        let LogicalPlan::Project { input, columns } = plan.root() else { panic!("expected Project") };
        assert_eq!(columns.len(), 4);
        assert!(matches!(input.as_ref(), LogicalPlan::Scan { .. }));
    }

    #[test]
    fn compile_errors_abort_assembly() {
        let h = Harness::seeded();
        let err = assemble(&h, json!({"select": {"columns": [{"table": {"name": "user"}, "column": "nope"}]}}))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Resolution);
    }
}
