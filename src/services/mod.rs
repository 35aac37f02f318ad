pub mod auth;
pub mod objects;
