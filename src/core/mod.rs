//! Configuration, constants and the error type shared by every module.

pub mod config;
pub mod constants;
pub mod error;

pub use config::EngineConfig;
pub use constants::*;
pub use error::GameError;
