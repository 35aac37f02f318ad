/*
 * Responsibility
 * - middleware public interface
 * - auth::authenticate / auth::authorize: who is calling, may they touch this repository
 * - verify: header and oid validators
 * - http: transport-level layers for the whole app
 */
pub mod auth;
pub mod http;
pub mod verify;
