use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::TimeDelta;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::compiler::{QueryError, Result};
use crate::database::{Config, Db, DbCollection, DbCommon, MemoryCollection};
use crate::interface::{CacheState, Clock, EngineConfig, NewQueryInterface, QueryInterface, QueryInterfaceUpdate};

/// Repository of `QueryInterface` entities, kept as rows of a regular table
/// so that templates can query it like any other.
#[derive(Clone)]
pub struct QueryStore {
    db: Db,
    table: MemoryCollection,
    clock: Arc<dyn Clock>,
    default_refresh_interval: TimeDelta,
    default_page_size: usize,
    locks: Arc<Mutex<HashMap<u64, Arc<Mutex<()>>>>>,
}

impl QueryStore {
    pub fn new(db: Db, config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let table = match db.get(&config.query_table) {
            Some(existing) => existing,
            None => db.create_with_config(&config.query_table, Config::int("id")),
        };
        Self {
            db,
            table,
            clock,
            default_refresh_interval: config.default_refresh_interval,
            default_page_size: config.default_page_size,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Store a new query interface. The template is validated here, so a
    /// malformed one is rejected before anything is written.
    pub fn create(&self, new: NewQueryInterface) -> Result<QueryInterface> {
        new.template.validate()?;
        let now = self.clock.now();
        let entity = QueryInterface {
            id: 0,
            name: new.name,
            template: new.template,
            refresh_interval: new.refresh_interval.unwrap_or(self.default_refresh_interval),
            last_run: None,
            last_result: None,
            last_page: 0,
            last_page_size: self.default_page_size,
            total_rows: 0,
            created_at: now,
            updated_at: now,
        };

        let row = self
            .table
            .add(Self::to_row(&entity)?)
            .ok_or_else(|| QueryError::Storage("query interface row was not stored".into()))?;
        let stored = QueryInterface::from_row(row)?;
        info!(id = stored.id, name = %stored.name, "created query interface");
        Ok(stored)
    }

    pub fn get(&self, id: u64) -> Result<QueryInterface> {
        QueryInterface::from_row(self.row(id)?)
    }

    pub fn list(&self) -> Result<Vec<QueryInterface>> {
        self.table.get_all().into_iter().map(QueryInterface::from_row).collect()
    }

    /// At most `limit` entities after skipping the first `skip`, in id order.
    pub fn list_page(&self, skip: usize, limit: usize) -> Result<Vec<QueryInterface>> {
        self.table.get_paginated(skip, limit).into_iter().map(QueryInterface::from_row).collect()
    }

    /// Waits for any run of `id` in progress, so a replaced template never
    /// receives the page computed from the old one.
    pub fn update(&self, id: u64, update: QueryInterfaceUpdate) -> Result<QueryInterface> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut entity = self.get(id)?;
        if let Some(name) = update.name {
            entity.name = name;
        }
        if let Some(interval) = update.refresh_interval {
            entity.refresh_interval = interval;
        }
        if let Some(template) = update.template {
            template.validate()?;
            entity.template = template;
            let cleared = CacheState::cleared(entity.refresh_interval, self.default_page_size);
            entity.last_run = cleared.last_run;
            entity.last_result = cleared.last_result;
            entity.last_page = cleared.last_page;
            entity.last_page_size = cleared.last_page_size;
            entity.total_rows = cleared.total_rows;
        }
        entity.updated_at = self.clock.now();

        let row = self.table.update(&id.to_string(), Self::to_row(&entity)?).ok_or(QueryError::QueryNotFound(id))?;
        debug!(id, "updated query interface");
        QueryInterface::from_row(row)
    }

    pub fn delete(&self, id: u64) -> Result<QueryInterface> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let row = self.table.delete(&id.to_string()).ok_or(QueryError::QueryNotFound(id))?;
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).remove(&id);
        info!(id, "deleted query interface");
        QueryInterface::from_row(row)
    }

    /// The mutex serializing cache refreshes and template changes of one query.
    pub(crate) fn lock_for(&self, id: u64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(id).or_default().clone()
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The raw stored row.
    pub fn row(&self, id: u64) -> Result<Value> {
        self.table.get(&id.to_string()).ok_or(QueryError::QueryNotFound(id))
    }

    pub fn cache_state(&self, id: u64) -> Result<CacheState> {
        CacheState::from_row(&self.row(id)?)
    }

    /// Overwrite the cache columns of one row, leaving the rest untouched.
    pub fn write_cache(&self, id: u64, cache: &CacheState) -> Result<()> {
        let patch: Map<String, Value> = match serde_json::to_value(cache) {
            Ok(Value::Object(m)) => m,
            Ok(_) => return Err(QueryError::Storage("cache state did not serialize to an object".into())),
            Err(e) => return Err(QueryError::Storage(e.to_string())),
        };
        self.table.update_partial(&id.to_string(), patch).ok_or(QueryError::QueryNotFound(id))?;
        Ok(())
    }

    fn to_row(entity: &QueryInterface) -> Result<Value> {
        serde_json::to_value(entity).map_err(|e| QueryError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::ManualClock;
    use crate::template::QueryTemplate;
    use crate::ErrorKind;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T08:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn store() -> (QueryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let store = QueryStore::new(Db::new_db(), &EngineConfig::default(), clock.clone());
        (store, clock)
    }

    fn template() -> QueryTemplate {
        QueryTemplate::parse(&json!({"select": {"columns": [{"table": {"name": "query_interface"}, "column": "*"}]}}))
            .unwrap()
    }

    #[test]
    fn create_assigns_sequential_ids_and_defaults() {
        let (store, _) = store();
        let a = store.create(NewQueryInterface::new("all", template())).unwrap();
        let b = store
            .create(NewQueryInterface::new("daily", template()).with_refresh_interval(TimeDelta::days(1)))
            .unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.refresh_interval, TimeDelta::hours(1));
        assert_eq!(b.refresh_interval, TimeDelta::days(1));
        assert_eq!(a.last_run, None);
        assert_eq!(a.created_at, start());
        assert_eq!(store.row(2).unwrap()["refresh_interval"], json!(86400));
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn table_is_registered_in_the_db() {
        let (store, _) = store();
        assert_eq!(store.db().list_collections(), vec!["query_interface"]);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let (store, _) = store();
        assert_eq!(store.get(9).unwrap_err(), QueryError::QueryNotFound(9));
        assert_eq!(store.delete(9).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn replacing_the_template_clears_the_cache() {
        let (store, clock) = store();
        let q = store.create(NewQueryInterface::new("all", template())).unwrap();

        let cache = CacheState {
            refresh_interval: q.refresh_interval,
            last_run: Some(clock.now()),
            last_result: Some(vec![json!({"x": 1})]),
            last_page: 2,
            last_page_size: 5,
            total_rows: 11,
        };
        store.write_cache(q.id, &cache).unwrap();
        assert_eq!(store.cache_state(q.id).unwrap(), cache);
        assert_eq!(store.get(q.id).unwrap().cache(), cache);

        clock.advance(TimeDelta::minutes(1));
        let renamed = store
            .update(q.id, QueryInterfaceUpdate { name: Some("renamed".into()), ..Default::default() })
            .unwrap();
        assert_eq!(renamed.name, "renamed");
        assert_eq!(renamed.total_rows, 11);
        assert_eq!(renamed.updated_at, start() + TimeDelta::minutes(1));

        let replaced = store
            .update(q.id, QueryInterfaceUpdate { template: Some(template()), ..Default::default() })
            .unwrap();
        assert_eq!(replaced.last_run, None);
        assert_eq!(replaced.last_result, None);
        assert_eq!(replaced.total_rows, 0);
    }

    #[test]
    fn delete_removes_the_row_and_its_lock() {
        let (store, _) = store();
        let q = store.create(NewQueryInterface::new("all", template())).unwrap();
        store.lock_for(q.id);
        assert_eq!(store.tracked_locks(), 1);

        assert_eq!(store.delete(q.id).unwrap().name, "all");
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.tracked_locks(), 0);
    }

    #[test]
    fn list_page_skips_and_limits() {
        let (store, _) = store();
        for name in ["a", "b", "c", "d"] {
            store.create(NewQueryInterface::new(name, template())).unwrap();
        }
        let names = |v: Vec<QueryInterface>| v.into_iter().map(|q| q.name).collect::<Vec<_>>();
        assert_eq!(names(store.list_page(1, 2).unwrap()), vec!["b", "c"]);
        assert_eq!(names(store.list_page(3, 10).unwrap()), vec!["d"]);
        assert!(store.list_page(9, 10).unwrap().is_empty());
    }

    #[test]
    fn update_waits_for_the_query_lock() {
        let (store, _) = store();
        let q = store.create(NewQueryInterface::new("all", template())).unwrap();

        let lock = store.lock_for(q.id);
        let guard = lock.lock().unwrap();
        let handle = {
            let store = store.clone();
            std::thread::spawn(move || {
                store.update(q.id, QueryInterfaceUpdate { name: Some("later".into()), ..Default::default() })
            })
        };

        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(store.get(q.id).unwrap().name, "all");
        drop(guard);
        assert_eq!(handle.join().unwrap().unwrap().name, "later");
    }
}
