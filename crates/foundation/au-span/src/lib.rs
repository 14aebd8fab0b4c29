//! Source origins and locations
//!
//! The parser attaches an [`Origin`] to every AST node it produces; the
//! semantic core threads origins through to the IR and into diagnostics.
//! Nothing here interprets source text — origins exist only so errors can
//! point somewhere.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for a source file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    /// Create a file ID from a raw index
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A line/column region in a source file
///
/// Lines and columns are 1-based. `line_text` optionally carries the full
/// source line for richer rendering by the external diagnostics formatter.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Source file
    pub file: FileId,
    /// Start line (1-based)
    pub line: u32,
    /// Start column (1-based)
    pub column: u32,
    /// End line (1-based, inclusive)
    pub end_line: u32,
    /// End column (1-based, inclusive)
    pub end_column: u32,
    /// Text of the start line, if the parser kept it
    pub line_text: Option<String>,
}

impl Origin {
    /// Create an origin covering a region
    pub fn new(file: FileId, line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            file,
            line,
            column,
            end_line,
            end_column,
            line_text: None,
        }
    }

    /// Create a zero-width origin at a single point
    pub fn point(file: FileId, line: u32, column: u32) -> Self {
        Self::new(file, line, column, line, column)
    }

    /// Attach the source line text
    pub fn with_line_text(mut self, text: impl Into<String>) -> Self {
        self.line_text = Some(text.into());
        self
    }

    /// Whether the origin spans more than one line
    pub fn is_multiline(&self) -> bool {
        self.end_line > self.line
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_start_position() {
        let origin = Origin::new(FileId(0), 3, 7, 3, 12);
        assert_eq!(origin.to_string(), "line 3, column 7");
    }

    #[test]
    fn point_is_zero_width() {
        let origin = Origin::point(FileId(1), 10, 2);
        assert_eq!(origin.end_line, 10);
        assert_eq!(origin.end_column, 2);
        assert!(!origin.is_multiline());
    }
}
