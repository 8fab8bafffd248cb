/*
 * Responsibility
 * - application services between handlers and the store
 */
pub mod auth;
pub mod id_codec;
pub mod resources;
