//! Persistence: row models, the `Store` contract and its two adapters.

pub mod memory;
pub mod models;
pub mod pg;
pub mod store;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{Store, StoreError, StoreResult, StoreTx};
