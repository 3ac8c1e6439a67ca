use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::compiler::{AggregateCall, ColumnRef, QueryError, Result, Truth};
use crate::database::{DbCollection, DbCommon};
use crate::executor::{Eval, Helpers};
use crate::functions::Accumulator;
use crate::planner::LogicalPlan;
use crate::Db;

/// One materialized row: qualified column keys inside the plan, output field
/// names after projection.
pub type Record = Map<String, Value>;

pub trait Executor {
    fn execute(&self, db: &Db) -> Result<Vec<Record>>;

    /// One zero-based page of the result together with the full match
    /// count, from a single execution.
    fn execute_page(&self, db: &Db, page: usize, page_size: usize) -> Result<(Vec<Record>, usize)> {
        let rows = self.execute(db)?;
        let total = rows.len();
        let offset = page.saturating_mul(page_size);
        Ok((rows.into_iter().skip(offset).take(page_size).collect(), total))
    }
}

pub struct PlanExecutor {
    plan: LogicalPlan,
}

impl Executor for PlanExecutor {
    fn execute(&self, db: &Db) -> Result<Vec<Record>> {
        Self::run_plan(&self.plan, db)
    }
}

type GroupEntry = (Vec<Value>, Vec<Box<dyn Accumulator>>);

impl PlanExecutor {
    pub fn new(plan: LogicalPlan) -> Self {
        Self { plan }
    }

    pub fn run_plan(plan: &LogicalPlan, db: &Db) -> Result<Vec<Record>> {
        match plan {
            LogicalPlan::Scan { backing, visible } => {
                let coll = db.get(backing).ok_or_else(|| QueryError::UnknownTable(backing.clone()))?;
                let out: Vec<Record> = coll
                    .get_all()
                    .into_iter()
                    .filter_map(|v| match v {
                        // prefix keys with visible name to match qualified columns
                        Value::Object(map) => {
                            Some(map.into_iter().map(|(k, vv)| (format!("{visible}.{k}"), vv)).collect::<Record>())
                        }
                        _ => None,
                    })
                    .collect();
                Ok(out)
            }
            LogicalPlan::Join { left, right, on } => {
                let left_rows = Self::run_plan(left, db)?;
                let right_rows = Self::run_plan(right, db)?;

                let mut out = Vec::new();
                for l in &left_rows {
                    for r in &right_rows {
                        let mut merged = l.clone();
                        merged.extend(r.iter().map(|(k, v)| (k.clone(), v.clone())));
                        if Eval::eval_predicate3(on, &merged)? == Truth::True {
                            out.push(merged);
                        }
                    }
                }
                Ok(out)
            }
            LogicalPlan::Filter { input, predicate } => {
                let mut out = Vec::new();
                for row in Self::run_plan(input, db)? {
                    if Eval::eval_predicate3(predicate, &row)? == Truth::True {
                        out.push(row);
                    }
                }
                Ok(out)
            }
            LogicalPlan::Aggregate { input, group_keys, aggs } => {
                let rows = Self::run_plan(input, db)?;
                Self::aggregate_rows(rows, group_keys, aggs)
            }
            LogicalPlan::Project { input, columns } => {
                let rows = Self::run_plan(input, db)?;
                let mut out = Vec::with_capacity(rows.len());
                for row in rows {
                    let mut proj = Map::new();
                    for c in columns {
                        proj.insert(c.name.clone(), Eval::eval_scalar(&c.expr, &row)?);
                    }
                    out.push(proj);
                }
                Ok(out)
            }
        }
    }

    // ---- Aggregation runner ----

    fn aggregate_rows(rows: Vec<Record>, group_keys: &[ColumnRef], calls: &[AggregateCall]) -> Result<Vec<Record>> {
        let new_accumulators = || calls.iter().map(|c| c.func.create_accumulator()).collect::<Vec<_>>();
        let mut groups: IndexMap<String, GroupEntry> = IndexMap::new();

        for row in rows {
            let gb_vals: Vec<Value> =
                group_keys.iter().map(|c| row.get(&c.qualified()).cloned().unwrap_or(Value::Null)).collect();
            let gk = Helpers::canonical_tuple(&gb_vals);

            let entry = groups.entry(gk).or_insert_with(|| (gb_vals, new_accumulators()));
            for (call, acc) in calls.iter().zip(entry.1.iter_mut()) {
                let args = call.args.iter().map(|a| Eval::eval_scalar(a, &row)).collect::<Result<Vec<_>>>()?;
                acc.update(&args)?;
            }
        }

        // no GROUP BY: one row even over empty input
        if groups.is_empty() && group_keys.is_empty() {
            groups.insert(String::new(), (Vec::new(), new_accumulators()));
        }

        let out = groups
            .into_values()
            .map(|(gb_vals, accs)| {
                let mut m: Record = group_keys.iter().map(|c| c.qualified()).zip(gb_vals).collect();
                for (call, acc) in calls.iter().zip(&accs) {
                    m.insert(call.slot.clone(), acc.finalize());
                }
                m
            })
            .collect();
        Ok(out)
    }
}
