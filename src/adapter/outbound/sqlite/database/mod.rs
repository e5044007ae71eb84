//! Pool store schema, row types and the migrated connection pool.

pub mod connection;
pub mod model;
pub mod schema;
