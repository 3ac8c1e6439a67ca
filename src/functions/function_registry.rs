use std::{collections::HashMap, fmt, sync::Arc};

use once_cell::sync::Lazy;

use crate::compiler::{QueryError, Result};
use crate::functions::{
    AggregateImpl, AvgImpl, CoalesceImpl, ConcatImpl, CountImpl, FunctionImpl, LengthImpl, LowerImpl, MaxImpl,
    MinImpl, ScalarImpl, SumImpl, TrimImpl, UpperImpl,
};

static DEFAULT_FUNCTIONS: Lazy<Arc<FunctionRegistry>> = Lazy::new(|| Arc::new(FunctionRegistry::build_default()));

/// Case-insensitive, closed set of functions a calculated column may call.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    by_name: HashMap<String, FunctionImpl>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared registry holding the built-in aggregates and scalars.
    pub fn default_registry() -> Arc<FunctionRegistry> {
        Arc::clone(&DEFAULT_FUNCTIONS)
    }

    fn build_default() -> Self {
        let mut registry = Self::new();
        registry.register_aggregate(CountImpl);
        registry.register_aggregate(SumImpl);
        registry.register_aggregate(AvgImpl);
        registry.register_aggregate(MinImpl);
        registry.register_aggregate(MaxImpl);
        registry.register_scalar(ConcatImpl);
        registry.register_scalar(UpperImpl);
        registry.register_scalar(LowerImpl);
        registry.register_scalar(LengthImpl);
        registry.register_scalar(TrimImpl);
        registry.register_scalar(CoalesceImpl);
        registry
    }

    pub fn register_aggregate<I: AggregateImpl + 'static>(&mut self, imp: I) {
        self.by_name.insert(imp.name().to_string(), FunctionImpl::Aggregate(Arc::new(imp)));
    }

    pub fn register_scalar<I: ScalarImpl + 'static>(&mut self, imp: I) {
        self.by_name.insert(imp.name().to_string(), FunctionImpl::Scalar(Arc::new(imp)));
    }

    pub fn get(&self, name: &str) -> Option<FunctionImpl> {
        self.by_name.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn resolve(&self, name: &str) -> Result<FunctionImpl> {
        self.get(name).ok_or_else(|| QueryError::UnknownFunction(name.to_string()))
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry").field("functions", &self.list()).finish()
    }
}
