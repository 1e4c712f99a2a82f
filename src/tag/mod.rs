pub mod error;

pub use error::{Result, TagError};

use std::fmt;
use std::str::FromStr;

/// Name used by encoders to skip a field entirely
pub const SKIP_NAME: &str = "-";

/// Check that a key can appear in a tag literal
///
/// Keys are non-empty and may not contain spaces, control characters,
/// the key/value separator or either quote character.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

fn is_key_char(c: char) -> bool {
    !(c == ' ' || c == ':' || c == '"' || c == '`' || c.is_control())
}

/// One key of a struct tag: `key:"name,opt1,opt2"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagItem {
    pub key: String,
    pub name: String,
    options: Vec<String>,
}

impl TagItem {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// Build an item from the raw text between the quotes
    pub fn from_value(key: impl Into<String>, value: &str) -> Self {
        let mut parts = value.split(',');
        let mut item = Self::new(key, parts.next().unwrap_or_default());
        for option in parts {
            item.add_option(option);
        }
        item
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Append an option unless it is already present
    pub fn add_option(&mut self, option: impl Into<String>) -> bool {
        let option = option.into();
        if self.has_option(&option) {
            return false;
        }
        self.options.push(option);
        true
    }

    pub fn remove_option(&mut self, option: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|o| o != option);
        self.options.len() != before
    }

    pub fn clear_options(&mut self) {
        self.options.clear();
    }

    /// Whether encoders are told to ignore the field for this key
    pub fn is_skipped(&self) -> bool {
        self.name == SKIP_NAME
    }

    /// The text written between the quotes
    pub fn value(&self) -> String {
        let mut value = self.name.clone();
        for option in &self.options {
            value.push(',');
            value.push_str(option);
        }
        value
    }
}

impl fmt::Display for TagItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\"{}\"", self.key, self.value())
    }
}

/// The full tag of a struct field, keys kept in written order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    items: Vec<TagItem>,
}

impl Tag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the unquoted contents of a tag literal
    ///
    /// Segments are `key:"value"` separated by spaces. Escapes inside the
    /// quoted value are skipped over but kept verbatim.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut tag = Tag::new();
        let mut rest = raw;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            let key_end = rest.find(|c: char| !is_key_char(c)).unwrap_or(rest.len());
            if key_end == 0 {
                return Err(TagError::EmptyKey(raw.len() - rest.len()));
            }
            let key = &rest[..key_end];

            let after_key = rest[key_end..]
                .strip_prefix(':')
                .ok_or_else(|| TagError::MissingColon(key.to_string()))?;
            let quoted = after_key
                .strip_prefix('"')
                .ok_or_else(|| TagError::MissingQuote(key.to_string()))?;

            let value_end = find_closing_quote(quoted)
                .ok_or_else(|| TagError::Unterminated(key.to_string()))?;

            if tag.get(key).is_some() {
                return Err(TagError::DuplicateKey(key.to_string()));
            }
            tag.items
                .push(TagItem::from_value(key, &quoted[..value_end]));

            rest = &quoted[value_end + 1..];
        }

        Ok(tag)
    }

    pub fn get(&self, key: &str) -> Option<&TagItem> {
        self.items.iter().find(|item| item.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TagItem> {
        self.items.iter_mut().find(|item| item.key == key)
    }

    /// Replace the item with the same key in place, or append it
    pub fn set(&mut self, item: TagItem) {
        match self.get_mut(&item.key) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn remove_key(&mut self, key: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.key != key);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn sort_by_key(&mut self) {
        self.items.sort_by(|a, b| a.key.cmp(&b.key));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key.as_str())
    }

    pub fn items(&self) -> &[TagItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut TagItem> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize back to tag syntax; empty string when there are no keys
    pub fn format(&self) -> String {
        self.items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Index of the unescaped `"` closing a value, relative to `quoted`
fn find_closing_quote(quoted: &str) -> Option<usize> {
    let bytes = quoted.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        Tag::parse(s)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
