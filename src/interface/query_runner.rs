use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::compiler::{QueryError, Result};
use crate::context::EngineContext;
use crate::database::{Db, SchemaCatalog};
use crate::executor::{Executor, PlanExecutor};
use crate::functions::FunctionRegistry;
use crate::interface::{CacheState, Clock, EngineConfig, QueryInterface, QueryStore, SystemClock};
use crate::planner::PlanBuilder;
use crate::template::QueryTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The cached page was still fresh.
    CacheHit,
    Executed,
    /// Compilation or execution failed; the records hold one `msg` entry.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub records: Vec<Value>,
    pub status: RunStatus,
}

/// Runs stored query interfaces with pagination and a per-query result cache.
pub struct QueryRunner {
    store: QueryStore,
    catalog: SchemaCatalog,
    functions: Arc<FunctionRegistry>,
    config: EngineConfig,
}

impl QueryRunner {
    pub fn new(db: Db) -> Self {
        Self::with_clock(db, EngineConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_config(db: Db, config: EngineConfig) -> Self {
        Self::with_clock(db, config, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Db, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: QueryStore::new(db, &config, clock),
            catalog: SchemaCatalog::new(),
            functions: FunctionRegistry::default_registry(),
            config,
        }
    }

    pub fn with_functions(mut self, functions: Arc<FunctionRegistry>) -> Self {
        self.functions = functions;
        self
    }

    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    /// The stored entity, without running it.
    pub fn get(&self, id: u64) -> Result<QueryInterface> {
        self.store.get(id)
    }

    pub fn run_default(&self, id: u64) -> Result<RunOutput> {
        self.run(id, 0, self.config.default_page_size)
    }

    /// Serve one page of a stored query.
    ///
    /// A cached page is returned while it is fresh and was produced for the
    /// same `page` and `page_size`. Otherwise the template is compiled against
    /// the live schema, executed once for the count and the page, and cached.
    /// Template updates and deletes of the same query wait for the run. Compile and
    /// execution failures come back as a single `{"msg": ...}` record and are
    /// cached like any other result; only an unknown id, a zero page size or a
    /// failure to persist the cache are returned as errors.
    pub fn run(&self, id: u64, page: usize, page_size: usize) -> Result<RunOutput> {
        if page_size == 0 {
            return Err(QueryError::validation("page_size must be greater than zero"));
        }

        if let Some(hit) = self.cached(id, page, page_size)? {
            return Ok(hit);
        }

        let lock = self.store.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        // someone else may have refreshed it while we waited
        if let Some(hit) = self.cached(id, page, page_size)? {
            return Ok(hit);
        }

        let cache = self.store.cache_state(id)?;
        let row = self.store.row(id)?;

        let (records, total_rows, status) = match self.execute(&row, page, page_size) {
            Ok((records, total_rows)) => (records, total_rows, RunStatus::Executed),
            Err(e) => {
                warn!(id, kind = ?e.kind(), error = %e, "query run failed");
                (vec![json!({ "msg": e.to_string() })], 0, RunStatus::Failed)
            }
        };

        let state = CacheState {
            refresh_interval: cache.refresh_interval,
            last_run: Some(self.store.clock().now()),
            last_result: Some(records.clone()),
            last_page: page,
            last_page_size: page_size,
            total_rows,
        };
        self.store.write_cache(id, &state)?;
        info!(id, page, page_size, total_rows, rows = records.len(), ?status, "executed query");

        Ok(RunOutput { records, status })
    }

    fn cached(&self, id: u64, page: usize, page_size: usize) -> Result<Option<RunOutput>> {
        let cache = self.store.cache_state(id)?;
        if !cache.is_fresh(self.store.clock().now(), page, page_size) {
            return Ok(None);
        }
        info!(id, page, page_size, "served cached query result");
        Ok(Some(RunOutput { records: cache.last_result.unwrap_or_default(), status: RunStatus::CacheHit }))
    }

    fn execute(&self, row: &Value, page: usize, page_size: usize) -> Result<(Vec<Value>, usize)> {
        let raw = row.get("template").ok_or_else(|| QueryError::validation("query interface has no template"))?;
        let template = QueryTemplate::parse(raw)?;

        let db = self.store.db();
        let engine = EngineContext::new(db, &self.catalog, &self.functions);
        let plan = PlanBuilder::assemble(&template, &engine)?;

        let (rows, total_rows) = PlanExecutor::new(plan.root().clone()).execute_page(db, page, page_size)?;
        Ok((rows.into_iter().map(Value::Object).collect(), total_rows))
    }
}
