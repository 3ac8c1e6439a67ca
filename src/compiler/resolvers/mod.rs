pub mod table_resolver;
pub mod argument_resolver;
pub mod comparison_resolver;
pub mod filter_resolver;
pub mod join_resolver;
pub mod group_by_resolver;
pub mod projection_resolver;

pub use table_resolver::TableResolver;
pub use argument_resolver::ArgumentResolver;
pub use comparison_resolver::ComparisonResolver;
pub use filter_resolver::FilterResolver;
pub use join_resolver::{CompiledJoin, JoinResolver};
pub use group_by_resolver::GroupByResolver;
pub use projection_resolver::{CalculatedUnit, OutputNamer, ProjectionResolver, ProjectionUnit};
