pub mod errors;
pub mod types;

pub use errors::{ConfigError, EmberError};
pub use types::Color;

pub type Result<T> = std::result::Result<T, EmberError>;
