//! Named-operation surface for prims.
//!
//! Every primitive is reachable through one call shape: an operation name
//! plus a JSON argument object, returning a JSON result object. Binary values
//! cross the boundary as hex. Failures never panic; they become a
//! [`DispatchError`] with a stable [`ErrorCode`], or the uniform
//! [`ErrorEnvelope`] via [`OperationRegistry::call`].
//!
//! # Quick Start
//!
//! ```rust
//! use prims_dispatch::{DispatchConfig, OperationRegistry};
//! use serde_json::json;
//!
//! let registry = OperationRegistry::standard(DispatchConfig::default());
//! let out = registry
//!     .dispatch("hash", json!({"data": "hello world", "algorithm": "SHA-256"}))
//!     .unwrap();
//! assert_eq!(
//!     out["hash"],
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
//! );
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod operation;
pub mod ops;
pub mod registry;

// Re-exports for convenience.
pub use config::DispatchConfig;
pub use error::{DispatchError, DispatchResult, ErrorCode, ErrorEnvelope};
pub use operation::{DynOperation, Operation, OperationInfo};
pub use registry::OperationRegistry;
