pub mod error;

pub use error::{ConfigError, Result};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::output::OutputFormat;
use crate::selector::Selection;
use crate::tag::is_valid_key;
use crate::transform::Transform;

/// Name of the optional defaults file searched for upward from the target
pub const CONFIG_FILE_NAME: &str = "retag.toml";

/// A tag key to add, with an explicit value or one derived by the transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTag {
    pub key: String,
    pub value: Option<String>,
}

/// A `key=option` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOption {
    pub key: String,
    pub option: String,
}

/// The requested tag mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSpec {
    pub add: Vec<AddTag>,
    pub add_options: Vec<KeyOption>,
    pub remove: Vec<String>,
    pub remove_options: Vec<KeyOption>,
    pub clear: bool,
    pub clear_options: bool,
    pub transform: Transform,
    /// Regenerate the name of keys that already exist on a field
    pub override_existing: bool,
    /// Sort keys alphabetically after editing
    pub sort: bool,
    /// Leave fields starting with a lowercase letter alone
    pub skip_unexported: bool,
}

impl EditSpec {
    pub fn is_noop(&self) -> bool {
        self.add.is_empty()
            && self.add_options.is_empty()
            && self.remove.is_empty()
            && self.remove_options.is_empty()
            && !self.clear
            && !self.clear_options
    }
}

/// Validated configuration for one rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub selection: Selection,
    pub edit: EditSpec,
    pub format: OutputFormat,
}

/// Raw, unvalidated options as given on the command line
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub struct_name: Option<String>,
    /// `N` or `N,M`
    pub line: Option<String>,
    pub offset: Option<usize>,
    pub all: bool,

    /// Bare keys, or `key:value` / `key=value` with an explicit value
    pub add: Vec<String>,
    /// `key:value` pairs
    pub add_literal: Vec<String>,
    pub add_options: Vec<String>,
    pub remove: Vec<String>,
    pub remove_options: Vec<String>,
    pub clear: bool,
    pub clear_options: bool,

    pub transform: Option<String>,
    pub format: Option<String>,
    pub override_existing: bool,
    pub sort: bool,
    pub skip_unexported: bool,
}

impl Options {
    /// Fill settings left unset on the command line from a defaults file
    pub fn with_defaults(mut self, defaults: &FileDefaults) -> Self {
        if self.transform.is_none() {
            self.transform = defaults.transform.clone();
        }
        if self.format.is_none() {
            self.format = defaults.format.clone();
        }
        self.sort |= defaults.sort.unwrap_or(false);
        self.override_existing |= defaults.override_existing.unwrap_or(false);
        self.skip_unexported |= defaults.skip_unexported.unwrap_or(false);
        self
    }

    /// Validate the options into a [`Config`]
    pub fn build(&self) -> Result<Config> {
        let selection = self.selection()?;

        let mut add = self
            .add
            .iter()
            .filter(|token| !token.trim().is_empty())
            .map(|token| parse_add(token.as_str()))
            .collect::<Result<Vec<_>>>()?;
        for token in self.add_literal.iter().filter(|t| !t.trim().is_empty()) {
            let literal = parse_add(token)?;
            if literal.value.is_none() {
                return Err(ConfigError::InvalidLiteral(token.clone()));
            }
            add.push(literal);
        }

        let remove = self
            .remove
            .iter()
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .map(|key| {
                if is_valid_key(key) {
                    Ok(key.to_string())
                } else {
                    Err(ConfigError::InvalidKey(key.to_string()))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let transform = match &self.transform {
            Some(name) => name.parse::<Transform>()?,
            None => Transform::default(),
        };
        let format = match &self.format {
            Some(name) => name
                .parse::<OutputFormat>()
                .map_err(ConfigError::UnknownFormat)?,
            None => OutputFormat::default(),
        };

        let edit = EditSpec {
            add,
            add_options: parse_key_options(&self.add_options)?,
            remove,
            remove_options: parse_key_options(&self.remove_options)?,
            clear: self.clear,
            clear_options: self.clear_options,
            transform,
            override_existing: self.override_existing,
            sort: self.sort,
            skip_unexported: self.skip_unexported,
        };
        if edit.is_noop() {
            return Err(ConfigError::NoOperation);
        }

        Ok(Config {
            selection,
            edit,
            format,
        })
    }

    fn selection(&self) -> Result<Selection> {
        let mut given = Vec::new();
        if let Some(name) = &self.struct_name {
            given.push(("--struct", Selection::StructName(name.clone())));
        }
        if let Some(line) = &self.line {
            let (start, end) = parse_lines(line)?;
            given.push(("--line", Selection::Lines { start, end }));
        }
        if let Some(offset) = self.offset {
            given.push(("--offset", Selection::Offset(offset)));
        }
        if self.all {
            given.push(("--all", Selection::All));
        }

        match given.len() {
            0 => Err(ConfigError::NoSelection),
            1 => Ok(given.remove(0).1),
            _ => {
                let flags: Vec<_> = given.iter().map(|(flag, _)| *flag).collect();
                Err(ConfigError::MultipleSelections(flags.join(", ")))
            }
        }
    }
}

/// Parse `N` or `N,M`; an end of 0 means the single line `N`
fn parse_lines(spec: &str) -> Result<(usize, usize)> {
    let invalid = || ConfigError::InvalidLine(spec.to_string());
    let (start, end) = spec.split_once(',').unwrap_or((spec, spec));

    let start: usize = start.trim().parse().map_err(|_| invalid())?;
    let end: usize = end.trim().parse().map_err(|_| invalid())?;
    if start == 0 {
        return Err(invalid());
    }

    let end = if end == 0 { start } else { end };
    if start > end {
        return Err(ConfigError::InvalidRange { start, end });
    }
    Ok((start, end))
}

fn parse_add(token: &str) -> Result<AddTag> {
    let token = token.trim();
    let (key, value) = match token.find([':', '=']) {
        Some(split) => (&token[..split], Some(token[split + 1..].to_string())),
        None => (token, None),
    };
    if !is_valid_key(key) {
        return Err(ConfigError::InvalidKey(key.to_string()));
    }
    Ok(AddTag {
        key: key.to_string(),
        value,
    })
}

fn parse_key_options(tokens: &[String]) -> Result<Vec<KeyOption>> {
    tokens
        .iter()
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .map(|token| {
            let (key, option) = token
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidOption(token.to_string()))?;
            if !is_valid_key(key) {
                return Err(ConfigError::InvalidKey(key.to_string()));
            }
            if option.is_empty() {
                return Err(ConfigError::InvalidOption(token.to_string()));
            }
            Ok(KeyOption {
                key: key.to_string(),
                option: option.to_string(),
            })
        })
        .collect()
}

/// Defaults read from `retag.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct FileDefaults {
    pub transform: Option<String>,
    pub format: Option<String>,
    pub sort: Option<bool>,
    #[serde(rename = "override")]
    pub override_existing: Option<bool>,
    pub skip_unexported: Option<bool>,
    /// Log level: error, warn, info, debug, trace
    pub log_level: Option<String>,
}

impl FileDefaults {
    /// Load defaults from the nearest `retag.toml`, if there is one
    pub fn load(start_path: impl AsRef<Path>) -> Result<Option<(PathBuf, Self)>> {
        let Some(config_path) = find_config_file(start_path.as_ref()) else {
            return Ok(None);
        };

        let config_data = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::ReadFailed(format!("{}: {}", config_path.display(), e))
        })?;
        let defaults: FileDefaults = toml::from_str(&config_data)?;

        debug!("Loaded defaults from {}", config_path.display());
        Ok(Some((config_path, defaults)))
    }
}

/// Find retag.toml by searching upward from the given path
fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let current_dir = if start_path.is_file() {
        start_path.parent()?
    } else {
        start_path
    };

    let mut current_dir = current_dir.canonicalize().ok()?;
    loop {
        let config_path = current_dir.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current_dir.pop() {
            return None;
        }
    }
}
