use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToTitleCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Naming convention used to derive a tag name from a field identifier
///
/// Every convention shares heck's word segmentation: words break on
/// lower-to-upper transitions and on `_`/`-`, and acronym runs such as
/// `ID` or `URL` stay one word. Letter/digit transitions are split before
/// heck sees the identifier, so `Field1` is two words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    #[default]
    SnakeCase,
    CamelCase,
    LispCase,
    PascalCase,
    TitleCase,
    Keep,
}

impl Transform {
    pub const ALL: [Transform; 6] = [
        Transform::SnakeCase,
        Transform::CamelCase,
        Transform::LispCase,
        Transform::PascalCase,
        Transform::TitleCase,
        Transform::Keep,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Transform::SnakeCase => "snakecase",
            Transform::CamelCase => "camelcase",
            Transform::LispCase => "lispcase",
            Transform::PascalCase => "pascalcase",
            Transform::TitleCase => "titlecase",
            Transform::Keep => "keep",
        }
    }

    pub fn apply(self, identifier: &str) -> String {
        let words = split_digits(identifier);
        match self {
            Transform::SnakeCase => words.to_snake_case(),
            Transform::CamelCase => words.to_lower_camel_case(),
            Transform::LispCase => words.to_kebab_case(),
            Transform::PascalCase => words.to_upper_camel_case(),
            Transform::TitleCase => words.to_title_case(),
            Transform::Keep => identifier.to_string(),
        }
    }
}

/// Insert `_` wherever a letter meets a digit
fn split_digits(identifier: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut prev: Option<char> = None;

    for c in identifier.chars() {
        if let Some(p) = prev {
            let boundary = (p.is_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_digit() && c.is_alphabetic());
            if boundary {
                out.push('_');
            }
        }
        out.push(c);
        prev = Some(c);
    }

    if out.len() == identifier.len() {
        Cow::Borrowed(identifier)
    } else {
        Cow::Owned(out)
    }
}

/// Returned when a transform name is not one of the known conventions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransform(pub String);

impl fmt::Display for UnknownTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<_> = Transform::ALL.iter().map(|t| t.as_str()).collect();
        write!(
            f,
            "unknown transform {:?} (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownTransform {}

impl FromStr for Transform {
    type Err = UnknownTransform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Transform::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTransform(s.to_string()))
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
