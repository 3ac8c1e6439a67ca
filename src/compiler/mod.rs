pub mod query_error;
pub mod truth;
pub mod like_pattern;
pub mod expr;
pub mod compile_context;
pub mod resolvers;
pub mod compiled_query;
pub mod query_compiler;

pub use query_error::{ErrorKind, QueryError, Result};
pub use truth::Truth;
pub use like_pattern::LikeMatcher;
pub use expr::{ColumnRef, LikePattern, Operand, Predicate, ScalarCall, ScalarExpr};
pub use compile_context::{CompileContext, ResolvedTable};
pub use resolvers::*;
pub use compiled_query::{AggregateCall, CompiledQuery, OutputColumn};
pub use query_compiler::QueryCompiler;
