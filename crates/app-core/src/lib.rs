//! Shared infrastructure for the backend services: configuration, the
//! application error type, axum extractors and middleware, JWT issuing, the
//! OAuth provider client and the Snowflake id generator.

pub mod config;
pub mod error;
pub mod extractors;
pub mod jwt;
pub mod middleware;
pub mod oauth;
pub mod rejection;
pub mod response;
pub mod uid;
