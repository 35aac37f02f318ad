/*
 * Responsibility
 * - HTTP surface: /health and the LFS routes
 */
pub mod health;
pub mod lfs;
