use std::ops::Range;
use tree_sitter::{Node, Tree};

use super::error::{ParseError, Result};
use super::literal::{self, Quoting};

/// A named struct type declaration (`type Foo struct { ... }`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    /// Byte span of the whole type spec, name included
    pub span: Range<usize>,
    pub start_line: usize,
    pub end_line: usize,
}

/// A tag literal attached to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLiteral {
    /// Byte span of the literal, delimiters included
    pub span: Range<usize>,
    /// Contents with the Go quoting removed
    pub value: String,
    pub quoting: Quoting,
}

/// One field declaration inside a struct type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// First declared name, or the type name of an embedded field
    pub name: String,
    pub embedded: bool,
    /// Innermost named struct containing this field
    pub struct_name: Option<String>,
    /// 1-based line the declaration starts on
    pub line: usize,
    pub span: Range<usize>,
    /// Where a new tag literal goes: right after the field type
    pub type_end: usize,
    pub tag: Option<TagLiteral>,
}

impl StructField {
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }

    /// Tag contents as written, empty when the field has no tag
    pub fn raw_tag(&self) -> &str {
        self.tag.as_ref().map(|t| t.value.as_str()).unwrap_or("")
    }
}

/// Struct declarations and fields of one Go source file
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub structs: Vec<StructDecl>,
    /// Every struct field in source order, nested structs included
    pub fields: Vec<StructField>,
}

impl SourceFile {
    pub fn structs_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a StructDecl> {
        self.structs.iter().filter(move |s| s.name == name)
    }
}

/// Collect struct declarations and fields from a parsed tree
pub fn extract(tree: &Tree, source: &str) -> Result<SourceFile> {
    let mut file = SourceFile::default();
    visit(tree.root_node(), source, None, &mut file)?;
    Ok(file)
}

fn visit(node: Node, source: &str, enclosing: Option<&str>, file: &mut SourceFile) -> Result<()> {
    let mut enclosing = enclosing.map(str::to_string);

    match node.kind() {
        "type_spec" | "type_alias" => {
            let is_struct = node
                .child_by_field_name("type")
                .is_some_and(|t| t.kind() == "struct_type");
            if is_struct {
                if let Some(name) = node
                    .child_by_field_name("name")
                    .and_then(|n| text(n, source))
                {
                    file.structs.push(StructDecl {
                        name: name.to_string(),
                        span: node.byte_range(),
                        start_line: node.start_position().row + 1,
                        end_line: node.end_position().row + 1,
                    });
                    enclosing = Some(name.to_string());
                }
            }
        }
        "field_declaration" => {
            if let Some(field) = parse_field(node, source, enclosing.as_deref())? {
                file.fields.push(field);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, source, enclosing.as_deref(), file)?;
    }
    Ok(())
}

fn parse_field(node: Node, source: &str, struct_name: Option<&str>) -> Result<Option<StructField>> {
    let Some(type_node) = node.child_by_field_name("type") else {
        return Ok(None);
    };
    let line = node.start_position().row + 1;

    let mut cursor = node.walk();
    let first_name = node
        .children_by_field_name("name", &mut cursor)
        .next()
        .and_then(|n| text(n, source));

    let (name, embedded) = match first_name {
        Some(name) => (name.to_string(), false),
        None => match embedded_type_name(type_node, source) {
            Some(name) => (name, true),
            None => return Ok(None),
        },
    };

    let tag = match node.child_by_field_name("tag") {
        Some(tag_node) => {
            let raw = text(tag_node, source).unwrap_or_default();
            let (value, quoting) =
                literal::unquote(raw).ok_or_else(|| ParseError::SyntaxError {
                    line,
                    message: format!("invalid tag literal {} on field {}", raw, name),
                })?;
            Some(TagLiteral {
                span: tag_node.byte_range(),
                value,
                quoting,
            })
        }
        None => None,
    };

    Ok(Some(StructField {
        name,
        embedded,
        struct_name: struct_name.map(str::to_string),
        line,
        span: node.byte_range(),
        type_end: type_node.end_byte(),
        tag,
    }))
}

/// Name an embedded field gets: the bare type name, without package or
/// type arguments
fn embedded_type_name(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "qualified_type" => node
            .child_by_field_name("name")
            .and_then(|n| text(n, source))
            .map(str::to_string),
        "generic_type" => node
            .child_by_field_name("type")
            .and_then(|n| embedded_type_name(n, source)),
        "pointer_type" => node
            .named_child(0)
            .and_then(|n| embedded_type_name(n, source)),
        _ => text(node, source).map(str::to_string),
    }
}

fn text<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    node.utf8_text(source.as_bytes()).ok()
}
