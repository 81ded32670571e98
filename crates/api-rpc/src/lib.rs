//! JSON-RPC API Layer
//!
//! Exposes the queue service operations as JSON-RPC 2.0 methods over HTTP.
//! Every method takes named (object) parameters.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
