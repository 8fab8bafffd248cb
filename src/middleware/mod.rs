/*
 * Responsibility
 * - middleware entry points (each exposes an `apply` that wraps a Router)
 */
pub mod auth;
pub mod http;
