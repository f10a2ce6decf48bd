//! # ToolScout API Server Library
//!
//! HTTP surface for the tool catalog and its review lifecycle.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers
//! - `telemetry`: Tracing subscriber setup

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod telemetry;
