//! Configuration loading, validation and logging setup.

pub mod abi;
pub mod logging;
pub mod settings;

pub use logging::LoggingConfig;
pub use settings::Config;
