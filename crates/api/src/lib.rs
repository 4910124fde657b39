//! Propstack API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! asset stager and the listing coordinator) so integration tests and the
//! binary entrypoint can both access them.

pub mod auth;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod stager;
pub mod state;
