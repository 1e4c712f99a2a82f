pub mod ops;

pub use ops::apply_edit;

use tracing::{debug, info};

use crate::config::Config;
use crate::core::{RetagError, Result};
use crate::parser::editor::SourceEditor;
use crate::parser::{literal, GoParser, StructField};
use crate::selector;
use crate::tag::Tag;

/// Tag state of one selected field before and after the edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub struct_name: Option<String>,
    pub field: String,
    pub line: usize,
    /// Tag contents as written in the source
    pub before: String,
    pub after: Tag,
}

impl FieldChange {
    pub fn is_modified(&self) -> bool {
        self.before != self.after.format()
    }
}

/// Result of rewriting one source file
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub source: String,
    pub changes: Vec<FieldChange>,
}

/// Parse `source`, select fields and apply the configured tag edit
///
/// Nothing is written until every selected field has been processed, so a
/// malformed tag anywhere in the selection fails the whole rewrite.
pub fn rewrite(source: &str, config: &Config) -> Result<Rewrite> {
    let mut parser = GoParser::new()?;
    let file = parser.parse_source(source)?;
    let selected = selector::select(&file, &config.selection)?;

    let edit = &config.edit;
    let mut editor = SourceEditor::new(source);
    let mut changes = Vec::with_capacity(selected.len());

    for field in selected {
        if edit.skip_unexported && !field.is_exported() {
            debug!(field = %field.name, line = field.line, "Skipping unexported field");
            continue;
        }

        let before = Tag::parse(field.raw_tag()).map_err(|source| RetagError::InvalidTag {
            field: field.name.clone(),
            line: field.line,
            source,
        })?;

        let mut after = before;
        apply_edit(&mut after, &field.name, edit);

        let formatted = after.format();
        debug!(
            field = %field.name,
            line = field.line,
            "Tag {:?} -> {:?}",
            field.raw_tag(),
            formatted
        );
        write_tag(&mut editor, source, field, &formatted);

        changes.push(FieldChange {
            struct_name: field.struct_name.clone(),
            field: field.name.clone(),
            line: field.line,
            before: field.raw_tag().to_string(),
            after,
        });
    }

    let modified = changes.iter().filter(|c| c.is_modified()).count();
    info!(
        "Rewrote {} of {} selected field(s) by {}",
        modified,
        changes.len(),
        config.selection
    );

    Ok(Rewrite {
        source: editor.apply_edits(),
        changes,
    })
}

/// Record the edit that puts `formatted` in place of the field's tag
fn write_tag(editor: &mut SourceEditor, source: &str, field: &StructField, formatted: &str) {
    match &field.tag {
        Some(tag) if tag.value == formatted => {}
        Some(tag) if formatted.is_empty() => {
            // Take the whitespace between type and tag with it
            let gap = &source[field.type_end..tag.span.start];
            let start = if gap.trim().is_empty() {
                field.type_end
            } else {
                tag.span.start
            };
            editor.delete(start..tag.span.end);
        }
        Some(tag) => editor.replace(tag.span.clone(), literal::quote(formatted)),
        None if formatted.is_empty() => {}
        None => editor.insert(field.type_end, format!(" {}", literal::quote(formatted))),
    }
}
