//! HTTP server module.
//!
//! TLS terminates at the load balancer in front of this service, so the server
//! speaks plain HTTP. It provides:
//! - Static asset serving
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;
pub mod static_files;

pub use server::{start_server, ServerError};
pub use shutdown::shutdown_signal;
