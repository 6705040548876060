//! Common error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A vendor or product id that is not a 16-bit hex number
    #[error("Cannot parse {name}: {value}")]
    InvalidId { name: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
