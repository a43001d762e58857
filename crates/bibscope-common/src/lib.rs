pub mod config;
pub mod country;
pub mod error;
pub mod ids;
pub mod types;

pub use error::{BibscopeError, Result};
pub use ids::*;
