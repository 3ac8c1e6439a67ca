pub mod json_primitive;
pub use json_primitive::*;

pub mod field_info;
pub use field_info::*;

pub mod schema_dict;
pub use schema_dict::*;

pub mod schema_version;
pub use schema_version::*;

pub mod schema_catalog;
pub use schema_catalog::*;

pub trait SchemaProvider {
    /// Reflect the current schema of a table by its real name.
    /// An existing table with no rows and no declared schema reflects as empty.
    fn schema_of(&self, table: &str) -> Option<SchemaDict>;

    /// Monotonic counter bumped whenever any table is created, dropped or
    /// changes shape.
    fn schema_version(&self) -> u64;
}
