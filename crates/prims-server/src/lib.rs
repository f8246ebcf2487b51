//! HTTP/JSON server for prims.
//!
//! Exposes the operation registry as a remote-procedure surface:
//! `POST /v1/ops/{name}` with a JSON argument object returns the result
//! object, or the error envelope with a 4xx/5xx status. Each call runs on
//! the blocking pool; the primitives themselves stay synchronous.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::PrimsServer;
