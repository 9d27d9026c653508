pub mod cleaner;
pub mod config;
pub mod error;
pub mod interactivity;
mod overrides;
pub mod templates;

pub use config::Config;
pub use error::ConfigError;
