/*
 * Responsibility
 * - Git LFS authentication/authorization gate
 * - exposes the modules so the binary and integration tests share one crate
 */
pub mod api;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod models;
pub mod oid;
pub mod services;
pub mod state;
pub mod stores;
