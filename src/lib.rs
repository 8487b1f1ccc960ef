//! Token-based authentication for the cinema API
//!
//! Issues HS256 access/refresh token pairs, verifies bearer tokens on
//! protected requests and manages the refresh token cookie.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
