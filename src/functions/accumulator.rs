use serde_json::Value;

use crate::compiler::Result;

/// Running state of one aggregate over one group.
///
/// The executor evaluates the call's arguments for every row of the group,
/// feeds them to `update`, and reads the result with `finalize`.
pub trait Accumulator: Send {
    fn update(&mut self, args: &[Value]) -> Result<()>;

    fn finalize(&self) -> Value;
}
