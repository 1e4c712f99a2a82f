pub mod editor;
pub mod error;
pub mod fields;
pub mod literal;

pub use error::{ParseError, Result};
pub use fields::{SourceFile, StructDecl, StructField, TagLiteral};
pub use literal::Quoting;

use tree_sitter::{Node, Parser, Tree};

/// Longest snippet of offending source quoted in a syntax error
const MAX_ERROR_SNIPPET: usize = 40;

/// Go language parser using tree-sitter
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a new Go parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ParseError::LanguageSetupFailed(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse Go source code, rejecting sources with syntax errors
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)?;
        check_syntax(&tree, source)?;
        Ok(tree)
    }

    /// Parse Go source and extract its struct fields
    pub fn parse_source(&mut self, source: &str) -> Result<SourceFile> {
        let tree = self.parse(source)?;
        fields::extract(&tree, source)
    }
}

/// tree-sitter recovers from errors; report the first one instead
fn check_syntax(tree: &Tree, source: &str) -> Result<()> {
    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    let node = first_error(root).unwrap_or(root);
    let message = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        let snippet = node.utf8_text(source.as_bytes()).unwrap_or_default();
        let snippet: String = snippet.chars().take(MAX_ERROR_SNIPPET).collect();
        format!("unexpected {:?}", snippet)
    };

    Err(ParseError::SyntaxError {
        line: node.start_position().row + 1,
        message,
    })
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}
