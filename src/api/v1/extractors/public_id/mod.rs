/*
 * Responsibility
 *  - bundle core and types
 *  - control what handlers get to see
 */
mod core;
mod types;

pub use types::*;
