use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::rewrite::{FieldChange, Rewrite};

/// How the result of a rewrite is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The whole file with tag literals substituted
    #[default]
    Source,
    /// A JSON array with one record per rewritten field
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(OutputFormat::Source),
            "json" => Ok(OutputFormat::Json),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Source => f.write_str("source"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// JSON record describing one field's tag before and after the rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    #[serde(rename = "struct")]
    pub struct_name: Option<String>,
    pub field: String,
    pub line: usize,
    pub before: String,
    pub tag: String,
    /// `key=option` pairs of the new tag
    pub options: Vec<String>,
}

impl From<&FieldChange> for FieldRecord {
    fn from(change: &FieldChange) -> Self {
        let options = change
            .after
            .items()
            .iter()
            .flat_map(|item| {
                item.options()
                    .iter()
                    .map(move |option| format!("{}={}", item.key, option))
            })
            .collect();

        Self {
            struct_name: change.struct_name.clone(),
            field: change.field.clone(),
            line: change.line,
            before: change.before.clone(),
            tag: change.after.format(),
            options,
        }
    }
}

/// Render a rewrite in the requested format
///
/// JSON lists only the fields whose tag actually changed.
pub fn render(rewrite: &Rewrite, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Source => Ok(rewrite.source.clone()),
        OutputFormat::Json => {
            let records: Vec<FieldRecord> = rewrite
                .changes
                .iter()
                .filter(|change| change.is_modified())
                .map(FieldRecord::from)
                .collect();
            serde_json::to_string_pretty(&records)
        }
    }
}
