use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DispatchConfig;
use crate::error::{DispatchError, DispatchResult, ErrorEnvelope};
use crate::operation::{DynOperation, OperationInfo};
use crate::ops;

/// The closed set of operations, keyed by wire name.
///
/// The registry holds no mutable state; a single instance can be shared
/// across threads and called concurrently.
pub struct OperationRegistry {
    operations: BTreeMap<&'static str, Box<dyn DynOperation>>,
    config: DispatchConfig,
}

impl OperationRegistry {
    /// An empty registry. Use [`Self::register`] to add operations, or
    /// [`Self::standard`] for the full built-in set.
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            operations: BTreeMap::new(),
            config,
        }
    }

    /// A registry holding every built-in operation.
    pub fn standard(config: DispatchConfig) -> Self {
        let mut registry = Self::new(config);
        for op in ops::builtin() {
            registry.register(op);
        }
        registry
    }

    /// Add an operation, replacing any existing one with the same name.
    pub fn register(&mut self, op: Box<dyn DynOperation>) {
        self.operations.insert(op.name(), op);
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Name and description of every operation, sorted by name.
    pub fn operations(&self) -> Vec<OperationInfo> {
        self.operations
            .values()
            .map(|op| OperationInfo {
                name: op.name(),
                description: op.description(),
            })
            .collect()
    }

    /// Run one operation.
    ///
    /// `args` must be a JSON object; `null` is treated as `{}`.
    pub fn dispatch(&self, name: &str, args: Value) -> DispatchResult<Value> {
        let start = Instant::now();
        let result = self.run(name, args);
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(_) => debug!(operation = name, elapsed_us, "operation completed"),
            // Codes only: messages may echo caller input
            Err(e) => warn!(operation = name, code = %e.code(), elapsed_us, "operation rejected"),
        }
        result
    }

    /// Run one operation, folding failures into the error envelope.
    ///
    /// This is the in-process call surface: it never returns an error.
    pub fn call(&self, name: &str, args: Value) -> Value {
        match self.dispatch(name, args) {
            Ok(value) => value,
            Err(e) => serde_json::to_value(ErrorEnvelope::from(&e)).unwrap_or_else(|_| {
                serde_json::json!({
                    "error": e.to_string(),
                    "code": e.code().as_str(),
                    "isError": true,
                })
            }),
        }
    }

    fn run(&self, name: &str, args: Value) -> DispatchResult<Value> {
        let op = self
            .operations
            .get(name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;

        let args = match args {
            Value::Null => Value::Object(Default::default()),
            Value::Object(_) => args,
            other => {
                return Err(DispatchError::InvalidArguments(format!(
                    "expected an argument object, got {}",
                    json_kind(&other)
                )))
            }
        };

        op.call(args, &self.config)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::standard(DispatchConfig::default())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
