use std::ops::Range;

/// Represents an edit operation on the source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start_byte: usize,
    pub end_byte: usize,
    pub replacement: String,
}

/// Collects byte-range edits against a source text and applies them in one
/// pass, leaving every byte outside the edited ranges untouched
pub struct SourceEditor {
    source: String,
    edits: Vec<Edit>,
}

impl SourceEditor {
    /// Create a new editor over a copy of the source
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace a byte range
    pub fn replace(&mut self, range: Range<usize>, replacement: impl Into<String>) {
        self.edits.push(Edit {
            start_byte: range.start,
            end_byte: range.end,
            replacement: replacement.into(),
        });
    }

    /// Insert text at a byte position
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(at..at, text);
    }

    /// Delete a byte range
    pub fn delete(&mut self, range: Range<usize>) {
        self.replace(range, String::new());
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply all edits and return the modified source
    ///
    /// Edits must not overlap.
    pub fn apply_edits(mut self) -> String {
        // Sort edits by start position (in reverse to apply from end to start)
        self.edits.sort_by(|a, b| b.start_byte.cmp(&a.start_byte));

        let mut result = self.source;

        for edit in self.edits {
            result.replace_range(edit.start_byte..edit.end_byte, &edit.replacement);
        }

        result
    }
}
