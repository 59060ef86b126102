//! o11y-pricing HTTP API service.
//!
//! This crate exposes the pricing engine over HTTP:
//!
//! - Catalog listing
//! - Cost estimates for a usage set, optionally projected from an
//!   infrastructure/application shape
//! - Usage projection
//!
//! The service is stateless: every request is priced against the catalog
//! loaded at start-up.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for the router

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
