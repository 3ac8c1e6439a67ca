use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compiler::{QueryError, Result};
use crate::template::QueryTemplate;

/// A stored, named query template together with its cached last page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInterface {
    pub id: u64,
    pub name: String,
    pub template: QueryTemplate,
    #[serde(with = "seconds")]
    pub refresh_interval: TimeDelta,
    pub last_run: Option<DateTime<Utc>>,
    pub last_result: Option<Vec<Value>>,
    pub last_page: usize,
    pub last_page_size: usize,
    pub total_rows: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QueryInterface {
    pub fn from_row(row: Value) -> Result<Self> {
        serde_json::from_value(row).map_err(|e| QueryError::Storage(format!("malformed query interface row: {e}")))
    }

    pub fn cache(&self) -> CacheState {
        CacheState {
            refresh_interval: self.refresh_interval,
            last_run: self.last_run,
            last_result: self.last_result.clone(),
            last_page: self.last_page,
            last_page_size: self.last_page_size,
            total_rows: self.total_rows,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewQueryInterface {
    pub name: String,
    pub template: QueryTemplate,
    /// Falls back to the engine default when unset.
    pub refresh_interval: Option<TimeDelta>,
}

impl NewQueryInterface {
    pub fn new(name: &str, template: QueryTemplate) -> Self {
        Self { name: name.to_string(), template, refresh_interval: None }
    }

    pub fn with_refresh_interval(mut self, interval: TimeDelta) -> Self {
        self.refresh_interval = Some(interval);
        self
    }
}

/// Fields an operator may replace. A new template drops the cached page.
#[derive(Debug, Clone, Default)]
pub struct QueryInterfaceUpdate {
    pub name: Option<String>,
    pub template: Option<QueryTemplate>,
    pub refresh_interval: Option<TimeDelta>,
}

/// The cache columns of a stored query interface, read without touching the
/// template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheState {
    #[serde(deserialize_with = "seconds::deserialize", skip_serializing)]
    pub refresh_interval: TimeDelta,
    pub last_run: Option<DateTime<Utc>>,
    pub last_result: Option<Vec<Value>>,
    pub last_page: usize,
    pub last_page_size: usize,
    pub total_rows: usize,
}

impl CacheState {
    pub fn from_row(row: &Value) -> Result<Self> {
        CacheState::deserialize(row).map_err(|e| QueryError::Storage(format!("malformed query interface row: {e}")))
    }

    /// Whether the cached page answers this request at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, page: usize, page_size: usize) -> bool {
        let Some(last_run) = self.last_run else { return false };
        self.last_result.is_some()
            && self.last_page == page
            && self.last_page_size == page_size
            && last_run.checked_add_signed(self.refresh_interval).is_some_and(|until| now <= until)
    }

    pub fn cleared(refresh_interval: TimeDelta, page_size: usize) -> Self {
        Self {
            refresh_interval,
            last_run: None,
            last_result: None,
            last_page: 0,
            last_page_size: page_size,
            total_rows: 0,
        }
    }
}

/// `TimeDelta` as whole seconds.
mod seconds {
    use chrono::TimeDelta;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TimeDelta, D::Error> {
        let secs = i64::deserialize(d)?;
        TimeDelta::try_seconds(secs).ok_or_else(|| D::Error::custom("refresh interval out of range"))
    }
}
