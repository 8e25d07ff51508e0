pub mod config;
pub mod error;
pub mod types;

pub use config::ValetConfig;
pub use error::{Result, ValetError};
pub use types::*;
