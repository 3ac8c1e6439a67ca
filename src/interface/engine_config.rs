use chrono::TimeDelta;

/// Engine-wide settings for the query interface layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Table holding the stored query interfaces.
    pub query_table: String,
    pub default_page_size: usize,
    pub default_refresh_interval: TimeDelta,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            query_table: "query_interface".to_string(),
            default_page_size: 25,
            default_refresh_interval: TimeDelta::hours(1),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(query_table: &str, default_page_size: usize, default_refresh_interval: TimeDelta) -> Self {
        Self { query_table: query_table.to_string(), default_page_size, default_refresh_interval }
    }
}
