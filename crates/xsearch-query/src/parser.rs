//! RSQL parser.
//!
//! Parses a token stream into an [`RsqlExpr`] using recursive descent, then assembles the
//! search tree from it.
//!
//! # Grammar
//!
//! ```text
//! expr       → and_expr ("," and_expr)*
//! and_expr   → primary (";" primary)*
//! primary    → "(" expr ")" | comparison
//! comparison → WORD COMPARATOR (WORD | QUOTED)
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. AND: `;`
//! 3. OR: `,`
//!
//! Both logic operators are left-associative.

use std::mem;

use tracing::debug;

use crate::{
    assemble::assemble,
    ast::RsqlExpr,
    error::{ParseError, QueryError},
    ids::{IdGenerator, UuidIds},
    lexer::{SpannedToken, Token, tokenize_spanned},
    model::{LogicOperator, SearchList},
};

/// Deepest parenthesis nesting accepted before parsing fails.
pub const MAX_DEPTH: usize = 256;

/// Recursive descent parser for RSQL expressions.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
    /// Number of parentheses currently open.
    depth: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parses the token stream into an expression.
    fn parse(mut self) -> Result<Option<RsqlExpr>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_expr()?;

        if let Some(token) = self.peek() {
            let message = match token {
                Token::RParen => "unexpected closing parenthesis".to_string(),
                other => format!("expected logic operator, found {}", describe(other)),
            };
            return Err(ParseError::new(message, Some(self.position)));
        }

        Ok(Some(expr))
    }

    /// Parses: expr → and_expr ("," and_expr)*
    fn parse_expr(&mut self) -> Result<RsqlExpr, ParseError> {
        let mut left = self.parse_and_expr()?;

        while self.check(&Token::Or) {
            self.advance(); // consume ,
            let right = self.parse_and_expr()?;
            left = RsqlExpr::logic(LogicOperator::Or, left, right);
        }

        Ok(left)
    }

    /// Parses: and_expr → primary (";" primary)*
    fn parse_and_expr(&mut self) -> Result<RsqlExpr, ParseError> {
        let mut left = self.parse_primary()?;

        while self.check(&Token::And) {
            self.advance(); // consume ;
            let right = self.parse_primary()?;
            left = RsqlExpr::logic(LogicOperator::And, left, right);
        }

        Ok(left)
    }

    /// Parses: primary → "(" expr ")" | comparison
    fn parse_primary(&mut self) -> Result<RsqlExpr, ParseError> {
        match self.peek() {
            Some(Token::LParen) => self.parse_group(),
            Some(Token::Word(_)) => self.parse_comparison(),
            Some(Token::RParen) => Err(ParseError::new(
                "unexpected closing parenthesis",
                Some(self.position),
            )),
            Some(token @ (Token::And | Token::Or)) => Err(ParseError::new(
                format!(
                    "unexpected logic operator {} (needs a comparison before it)",
                    describe(token)
                ),
                Some(self.position),
            )),
            Some(token) => Err(ParseError::new(
                format!("expected field name, found {}", describe(token)),
                Some(self.position),
            )),
            None => Err(ParseError::new("unexpected end of expression", None)),
        }
    }

    /// Parses a parenthesized expression, consuming the surrounding parentheses.
    fn parse_group(&mut self) -> Result<RsqlExpr, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(
                format!("expression nested too deeply (more than {MAX_DEPTH} parentheses)"),
                Some(self.position),
            ));
        }
        self.advance(); // consume (
        self.depth += 1;
        let inner = self.parse_expr()?;
        self.depth -= 1;

        if !self.check(&Token::RParen) {
            return Err(ParseError::new(
                "expected closing parenthesis",
                self.index_or_end(),
            ));
        }
        self.advance(); // consume )

        Ok(RsqlExpr::group(inner))
    }

    /// Parses: comparison → WORD COMPARATOR (WORD | QUOTED)
    fn parse_comparison(&mut self) -> Result<RsqlExpr, ParseError> {
        let Some(Token::Word(selector)) = self.peek().cloned() else {
            unreachable!("parse_comparison called on non-word token");
        };
        self.advance();

        let Some(Token::Comparison(operator)) = self.peek().cloned() else {
            return Err(ParseError::new(
                format!("expected comparison operator after '{selector}'"),
                self.index_or_end(),
            ));
        };
        self.advance();

        let value = match self.peek().cloned() {
            Some(Token::Word(value) | Token::Quoted(value)) => value,
            Some(other) => {
                return Err(ParseError::new(
                    format!("expected value, found {}", describe(&other)),
                    Some(self.position),
                ));
            }
            None => {
                return Err(ParseError::new(
                    format!("expected value after '{selector}{operator}'"),
                    None,
                ));
            }
        };
        self.advance();

        Ok(RsqlExpr::comparison(selector, operator, value))
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// The current token index, or `None` at end of input.
    fn index_or_end(&self) -> Option<usize> {
        (self.position < self.tokens.len()).then_some(self.position)
    }

    /// Checks if the current token matches the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(t) == mem::discriminant(token))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Describes a token for error messages.
fn describe(token: &Token) -> String {
    match token {
        Token::Word(word) => format!("'{word}'"),
        Token::Quoted(value) => format!("quoted value '{value}'"),
        Token::Comparison(op) => format!("'{op}'"),
        Token::And => "';'".to_string(),
        Token::Or => "','".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
    }
}

/// Parses an RSQL string into an expression tree.
///
/// Returns `Ok(None)` for empty input, `Ok(Some(expr))` for valid input,
/// or `Err(QueryError)` for invalid syntax.
pub fn parse_expr(input: &str) -> Result<Option<RsqlExpr>, QueryError> {
    let spanned = tokenize_spanned(input).map_err(QueryError::from)?;
    let offsets: Vec<usize> = spanned.iter().map(|t| t.start).collect();
    let tokens = spanned
        .into_iter()
        .map(|SpannedToken { token, .. }| token)
        .collect();

    Parser::new(tokens).parse().map_err(|err| {
        let position = err
            .token_index
            .and_then(|idx| offsets.get(idx).copied())
            .unwrap_or(input.len());
        QueryError::parse(err.message, Some(position), Some(input.to_string()))
    })
}

/// Parses an RSQL string into a search list, with random ids.
///
/// Empty input yields an empty root group.
pub fn parse_rsql(input: &str) -> Result<SearchList, QueryError> {
    parse_rsql_with(input, &UuidIds)
}

/// Parses an RSQL string into a search list, taking ids from `ids`.
pub fn parse_rsql_with(input: &str, ids: &dyn IdGenerator) -> Result<SearchList, QueryError> {
    let expr = parse_expr(input)?;
    let root = assemble(expr.as_ref(), ids);
    debug!(
        terms = root.term_count(),
        elements = root.elements.len(),
        "parsed rsql expression"
    );
    Ok(SearchList::new(root))
}
