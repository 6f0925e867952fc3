//! Error codes of the table reader.
//!
//! Codes are grouped by the stage that raises them:
//! - `E0xx` - Lexical errors (cell and line syntax)
//! - `E1xx` - Structural errors (header, row shape, names)
//! - `E2xx` - Value errors (cell contents)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E0xx)
    // =========================================================================
    /// Unterminated quoted cell.
    ///
    /// A cell was opened with `"` but the line ended before the closing quote.
    E001,

    /// Unexpected character.
    ///
    /// Text follows a closing quote before the next `;`, or a carriage return
    /// appears outside a line ending.
    E002,

    // =========================================================================
    // Structural Errors (E1xx)
    // =========================================================================
    /// Missing header.
    ///
    /// The table has no non-blank line.
    E100,

    /// Row length mismatch.
    ///
    /// A row has a different number of cells than the header.
    E101,

    /// No value columns.
    ///
    /// The header holds only the identifier column.
    E102,

    /// Empty name.
    ///
    /// A header column or a row identifier is empty.
    E103,

    /// Duplicate entry.
    ///
    /// The same name appears on several rows of a centrality table.
    E104,

    // =========================================================================
    // Value Errors (E2xx)
    // =========================================================================
    /// Invalid number.
    ///
    /// A cell could not be read as a decimal number.
    E200,

    /// Missing value.
    ///
    /// A cell that must hold a number is empty.
    E201,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated quoted cell",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E100 => "missing header",
            ErrorCode::E101 => "row length mismatch",
            ErrorCode::E102 => "no value columns",
            ErrorCode::E103 => "empty name",
            ErrorCode::E104 => "duplicate entry",
            ErrorCode::E200 => "invalid number",
            ErrorCode::E201 => "missing value",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E101.to_string(), "E101");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated quoted cell");
        assert_eq!(ErrorCode::E101.description(), "row length mismatch");
        assert_eq!(ErrorCode::E201.description(), "missing value");
    }
}
