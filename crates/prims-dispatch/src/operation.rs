use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::DispatchConfig;
use crate::error::{DispatchError, DispatchResult};

// ---------------------------------------------------------------------------
// Operation trait
// ---------------------------------------------------------------------------

/// A single named operation on the surface.
///
/// Calling an operation is two phases. [`Operation::validate`] turns the
/// decoded argument object into a ready input (parsing names, decoding hex,
/// checking limits) and performs no cryptographic work. [`Operation::execute`]
/// does the work and cannot fail on caller input that validation accepted,
/// apart from key material that only the primitive itself can reject.
pub trait Operation: Send + Sync {
    /// The JSON argument object.
    type Args: DeserializeOwned;
    /// Validated input handed to `execute`.
    type Input;
    /// The JSON result object.
    type Output: Serialize;

    /// Wire name, e.g. `"merkle_proof"`.
    fn name(&self) -> &'static str;

    /// One-line summary for operation listings.
    fn description(&self) -> &'static str;

    fn validate(&self, args: Self::Args, limits: &DispatchConfig) -> DispatchResult<Self::Input>;

    fn execute(&self, input: Self::Input) -> DispatchResult<Self::Output>;
}

// ---------------------------------------------------------------------------
// Type-erased form stored in the registry
// ---------------------------------------------------------------------------

/// Object-safe view of an [`Operation`], so that operations with different
/// argument types can share a `BTreeMap<&str, Box<dyn DynOperation>>`.
pub trait DynOperation: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Decode, validate and execute in one step.
    fn call(&self, args: Value, limits: &DispatchConfig) -> DispatchResult<Value>;
}

impl<T: Operation> DynOperation for T {
    fn name(&self) -> &'static str {
        Operation::name(self)
    }

    fn description(&self) -> &'static str {
        Operation::description(self)
    }

    fn call(&self, args: Value, limits: &DispatchConfig) -> DispatchResult<Value> {
        let args: T::Args = serde_json::from_value(args)
            .map_err(|e| DispatchError::InvalidArguments(e.to_string()))?;
        let input = self.validate(args, limits)?;
        let output = self.execute(input)?;
        serde_json::to_value(output)
            .map_err(|e| DispatchError::Internal(format!("failed to encode result: {e}")))
    }
}

/// Name and description of a registered operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperationInfo {
    pub name: &'static str,
    pub description: &'static str,
}
