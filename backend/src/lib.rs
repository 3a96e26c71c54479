//! # Machines Backend
//!
//! Web backend for registering industrial machines (equipment metadata such as
//! brand, serial number and installation location) in a relational database.
//!
//! The crate serves a handful of static HTML pages and accepts JSON
//! submissions that insert rows into the `machines` table.
//!
//! ## Architecture
//!
//! - [`config`]: Application configuration (TOML file plus environment overrides)
//! - [`db`]: Record model, repository trait, Postgres and in-memory backends
//! - [`templates`]: HTML page store loaded once at startup
//! - [`http`]: Axum router and request handlers
//!
//! ## Features
//!
//! - `postgres-repo`: Diesel-backed Postgres repository
//! - `local-repo`: In-memory repository (default)
//! - `http-server`: Axum HTTP layer and the `machines-server` binary (default)

pub mod config;
pub mod db;
pub mod templates;

#[cfg(feature = "http-server")]
pub mod http;
