/*
 * Responsibility
 * - the external store: trait + Postgres and in-memory backends
 */
pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod principal_repo;
pub mod resource_repo;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::Store;
