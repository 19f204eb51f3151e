//! Rave Storage Layer
//!
//! Durable key-value slots backing per-tab client state.
//! A slot is written once and read many times; nothing here expires data.

mod database;
mod error;
mod memory;
mod migrations;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use store::KeyValueStore;

pub type Result<T> = std::result::Result<T, StorageError>;
