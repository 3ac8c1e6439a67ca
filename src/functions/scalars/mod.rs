pub mod string_impls;
pub use string_impls::*;

pub mod coalesce_impl;
pub use coalesce_impl::*;
