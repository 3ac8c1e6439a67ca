pub mod helpers;
pub use helpers::*;

pub mod eval;
pub use eval::*;

pub mod plan_executor;
pub use plan_executor::*;
