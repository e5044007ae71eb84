//! SQLite persistence adapters.
//!
//! Provides the pool reserve view and the polling cursor using Diesel ORM.

pub mod cursor;
pub mod database;
pub mod pool_state;
pub mod settings;

pub use cursor::SqliteBlockCursorStore;
pub use pool_state::SqlitePoolStateGateway;
pub use settings::PoolStoreConfig;
