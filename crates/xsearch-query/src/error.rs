//! Error types for RSQL lexing and parsing.

use std::{error::Error, fmt};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.position)
    }
}

impl Error for LexError {}

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Token index where error occurred (`None` at end of input).
    pub token_index: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, token_index: Option<usize>) -> Self {
        Self {
            message: message.into(),
            token_index,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(idx) = self.token_index {
            write!(f, "at token {}: {}", idx, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl Error for ParseError {}

/// A unified error type for RSQL parsing.
///
/// Carries the original expression and, where known, the byte position of the problem so the
/// message can point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original RSQL expression (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Lexer error (tokenization failed).
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// Parser error (grammar violation).
    Parse {
        /// Error message.
        message: String,
        /// Byte position in input (if available).
        position: Option<usize>,
    },
}

impl QueryError {
    /// Creates a lex error.
    pub fn lex(message: impl Into<String>, position: usize, query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: message.into(),
                position,
            },
            query: Some(query.into()),
        }
    }

    /// Creates a parse error.
    pub fn parse(
        message: impl Into<String>,
        position: Option<usize>,
        query: Option<String>,
    ) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: message.into(),
                position,
            },
            query,
        }
    }

    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } | QueryErrorKind::Parse { message, .. } => message,
        }
    }

    /// Returns the byte position of the error, if known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Parse { position, .. } => *position,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        if message.contains("unclosed quote") {
            Some("Add a closing quote to complete the value")
        } else if message.contains("closing parenthesis") {
            Some("Add a closing parenthesis ) to match the opening one")
        } else if message.contains("comparison operator") {
            Some("Comparisons look like field==value, e.g. settlement-search=='Leipzig'")
        } else if message.contains("logic operator") {
            Some("';' (AND) and ',' (OR) need a comparison on both sides")
        } else if message.contains("nested too deeply") {
            Some("Remove redundant parentheses around the expression")
        } else {
            None
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.message())?;

        if let Some(query) = &self.query {
            writeln!(f, "  {}", query)?;
            if let Some(pos) = self.position() {
                let column = query.char_indices().take_while(|(i, _)| *i < pos).count();
                writeln!(f, "  {}^", " ".repeat(column))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {}", suggestion)?;
        }

        Ok(())
    }
}

impl Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: err.message,
                position: err.position,
            },
            query: Some(err.input),
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: err.message,
                position: None,
            },
            query: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = QueryError::lex("unclosed quote", 7, "title=='oops");
        let display = err.to_string();
        assert!(display.contains("unclosed quote"));
        assert!(display.contains("title=='oops"));
        assert!(display.contains("       ^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn parse_error_display() {
        let err = QueryError::parse(
            "expected closing parenthesis",
            Some(8),
            Some("(a=='1'".to_string()),
        );
        let display = err.to_string();
        assert!(display.contains("expected closing parenthesis"));
        assert!(display.contains("(a=='1'"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn caret_is_clamped_to_query_length() {
        let err = QueryError::parse("unexpected end of expression", Some(99), Some("a".into()));
        let display = err.to_string();
        assert!(display.contains("\n   ^"));
    }

    #[test]
    fn caret_counts_characters_not_bytes() {
        // `)` sits at byte 8 but is the eighth character, after a two-byte `ö`.
        let err = QueryError::parse(
            "unexpected closing parenthesis",
            Some(8),
            Some("a=='ö';)".into()),
        );
        let display = err.to_string();
        assert!(display.contains(&format!("\n  {}^\n", " ".repeat(7))));
    }

    #[test]
    fn deep_nesting_suggestion() {
        let err = QueryError::parse("expression nested too deeply", Some(0), None);
        assert!(err.suggestion().unwrap().contains("parentheses"));
    }

    #[test]
    fn error_with_query() {
        let err = QueryError::parse("test error", None, None).with_query("a==b;");
        assert_eq!(err.query.as_deref(), Some("a==b;"));
        assert_eq!(err.position(), None);
    }

    #[test]
    fn message_extraction() {
        let err = QueryError::lex("test message", 0, "query");
        assert_eq!(err.message(), "test message");
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn logic_operator_suggestion() {
        let err = QueryError::parse("unexpected logic operator ';'", Some(0), None);
        assert!(err.suggestion().unwrap().contains("both sides"));
    }

    #[test]
    fn unknown_errors_have_no_suggestion() {
        let err = QueryError::parse("something odd", None, None);
        assert!(err.suggestion().is_none());
    }
}
