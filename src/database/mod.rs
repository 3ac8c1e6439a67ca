pub mod id_type;
pub use id_type::*;

pub mod id_manager;
pub use id_manager::*;

pub mod config;
pub use config::*;

pub mod db_collection;
pub use db_collection::*;

pub mod db;
pub use db::*;

pub mod schema;
pub use schema::*;
