//! Linkcatalog: a personal catalog of categories and links with a batch
//! import engine.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod engine;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
