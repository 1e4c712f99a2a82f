use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::parser::{SourceFile, StructField};

/// Field selection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("offset {0} is not inside any struct field")]
    OffsetNotFound(usize),

    #[error("invalid struct name {0:?}")]
    InvalidStructName(String),
}

/// Which fields of a file are rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Fields of every struct declared with this name
    StructName(String),
    /// Fields whose declaration starts on a line in `start..=end` (1-based)
    Lines { start: usize, end: usize },
    /// The innermost field whose declaration contains this byte offset
    Offset(usize),
    /// Every field in the file
    All,
}

impl Selection {
    pub fn validate(&self) -> Result<(), SelectError> {
        match self {
            Selection::StructName(name) if !is_identifier(name) => {
                Err(SelectError::InvalidStructName(name.clone()))
            }
            _ => Ok(()),
        }
    }

    pub fn matches(&self, field: &StructField, file: &SourceFile) -> bool {
        match self {
            Selection::StructName(name) => file
                .structs_named(name)
                .any(|decl| decl.span.start <= field.span.start && field.span.end <= decl.span.end),
            // Leading comments are not part of the field, so a range covering
            // them hits the field only if it also reaches the field's own line
            Selection::Lines { start, end } => (*start..=*end).contains(&field.line),
            Selection::Offset(offset) => field.span.contains(offset),
            Selection::All => true,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::StructName(name) => write!(f, "struct {}", name),
            Selection::Lines { start, end } if start == end => write!(f, "line {}", start),
            Selection::Lines { start, end } => write!(f, "lines {}-{}", start, end),
            Selection::Offset(offset) => write!(f, "offset {}", offset),
            Selection::All => f.write_str("all structs"),
        }
    }
}

/// Fields matching the selection, in declaration order
///
/// An unmatched struct name or line range is an empty selection; an
/// unmatched offset is an error.
pub fn select<'a>(
    file: &'a SourceFile,
    selection: &Selection,
) -> Result<Vec<&'a StructField>, SelectError> {
    selection.validate()?;

    let matched: Vec<&StructField> = file
        .fields
        .iter()
        .filter(|field| selection.matches(field, file))
        .collect();

    let selected = match selection {
        Selection::Offset(offset) => {
            let innermost = matched
                .into_iter()
                .min_by_key(|field| field.span.len())
                .ok_or(SelectError::OffsetNotFound(*offset))?;
            vec![innermost]
        }
        _ => matched,
    };

    debug!("Selected {} field(s) by {}", selected.len(), selection);
    Ok(selected)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::GoParser;

    const SOURCE: &str = "package foo

type foo struct {
\tbar string
\t// t is a flag
\tt   bool
}

type other struct {
\tbaz int
\tqux struct {
\t\tquux int
\t}
}

type foo struct {
\tdup int
}
";

    fn file() -> SourceFile {
        GoParser::new().unwrap().parse_source(SOURCE).unwrap()
    }

    fn names(fields: &[&StructField]) -> Vec<String> {
        fields.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn test_struct_name_includes_duplicates() {
        let file = file();
        let selected = select(&file, &Selection::StructName("foo".into())).unwrap();
        assert_eq!(names(&selected), vec!["bar", "t", "dup"]);
    }

    #[test]
    fn test_struct_name_includes_nested_fields() {
        let file = file();
        let selected = select(&file, &Selection::StructName("other".into())).unwrap();
        assert_eq!(names(&selected), vec!["baz", "qux", "quux"]);
    }

    #[test]
    fn test_struct_name_miss_is_empty() {
        let file = file();
        let selected = select(&file, &Selection::StructName("DoesNotExist".into())).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_invalid_struct_name() {
        let file = file();
        assert_eq!(
            select(&file, &Selection::StructName("foo bar".into())),
            Err(SelectError::InvalidStructName("foo bar".into()))
        );
        assert_eq!(
            select(&file, &Selection::StructName("1foo".into())),
            Err(SelectError::InvalidStructName("1foo".into()))
        );
    }

    #[test]
    fn test_single_line() {
        let file = file();
        let selected = select(&file, &Selection::Lines { start: 4, end: 4 }).unwrap();
        assert_eq!(names(&selected), vec!["bar"]);
    }

    #[test]
    fn test_line_range_starting_on_leading_comment() {
        let file = file();
        let selected = select(&file, &Selection::Lines { start: 5, end: 6 }).unwrap();
        assert_eq!(names(&selected), vec!["t"]);
    }

    #[test]
    fn test_line_range_ending_on_leading_comment() {
        let file = file();
        let selected = select(&file, &Selection::Lines { start: 4, end: 5 }).unwrap();
        assert_eq!(names(&selected), vec!["bar"]);

        let selected = select(&file, &Selection::Lines { start: 5, end: 5 }).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_line_range_spanning_structs() {
        let file = file();
        let selected = select(&file, &Selection::Lines { start: 6, end: 10 }).unwrap();
        assert_eq!(names(&selected), vec!["t", "baz"]);
    }

    #[test]
    fn test_offset_picks_one_field() {
        let file = file();
        let offset = SOURCE.find("bool").unwrap();
        let selected = select(&file, &Selection::Offset(offset)).unwrap();
        assert_eq!(names(&selected), vec!["t"]);
    }

    #[test]
    fn test_offset_picks_innermost_field() {
        let file = file();
        let offset = SOURCE.find("quux").unwrap();
        let selected = select(&file, &Selection::Offset(offset)).unwrap();
        assert_eq!(names(&selected), vec!["quux"]);
    }

    #[test]
    fn test_offset_miss() {
        let file = file();
        assert_eq!(
            select(&file, &Selection::Offset(0)),
            Err(SelectError::OffsetNotFound(0))
        );
        assert_eq!(
            select(&file, &Selection::Offset(SOURCE.len() + 10)),
            Err(SelectError::OffsetNotFound(SOURCE.len() + 10))
        );
    }

    #[test]
    fn test_all() {
        let file = file();
        let selected = select(&file, &Selection::All).unwrap();
        assert_eq!(selected.len(), 6);
    }
}
