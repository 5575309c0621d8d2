//! deploy-status: deployment status page and health endpoint.
//!
//! The health reporter answers `GET /api/health` with a fresh snapshot of the
//! process. The status viewer fetches that snapshot and renders it, either as
//! the HTML status page or in a terminal.

pub mod config;
pub mod console;
pub mod error;
pub mod health;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod templates;
pub mod viewer;

pub use error::AppError;
