//! Mock-interview API server library.
//!
//! Exposes the building blocks (config, service bootstrap, state, error
//! handling, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod analytics;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
