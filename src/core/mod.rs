pub mod error;

pub use error::{RetagError, Result};
