//! # Orgbook API Server Library
//!
//! User registration/login and organisation membership over HTTP.
//!
//! ## Modules
//!
//! - `app`: Application state, router, and the auth gate
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
