//! Stored query interfaces and the cached, paginated runner over them.

pub mod clock;
pub use clock::*;

pub mod engine_config;
pub use engine_config::*;

pub mod query_interface;
pub use query_interface::*;

pub mod query_store;
pub use query_store::*;

pub mod query_runner;
pub use query_runner::*;
