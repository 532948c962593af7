//! Blood Bank Core - blood bank management backend
//!
//! REST API for donors, blood inventory and blood requests, with
//! username/password accounts and bearer-token sessions.

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
