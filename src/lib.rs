//! Add, remove and clear struct field tags in Go source files.
//!
//! The pipeline is: validate a [`config::Config`], parse the source with
//! tree-sitter, select fields, edit each field's [`tag::Tag`], then render
//! either the rewritten source or a JSON description of the changes.

pub mod config;
pub mod core;
pub mod output;
pub mod parser;
pub mod rewrite;
pub mod selector;
pub mod source;
pub mod tag;
pub mod transform;

pub use crate::config::{Config, Options};
pub use crate::core::{RetagError, Result};
pub use crate::output::OutputFormat;

/// Rewrite `source` and render it in the configured output format
pub fn run(source: &str, config: &Config) -> Result<String> {
    let rewrite = rewrite::rewrite(source, config)?;
    Ok(output::render(&rewrite, config.format)?)
}
