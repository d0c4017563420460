//! RSQL lexer (tokenizer).
//!
//! Converts an RSQL expression into a stream of tokens for the parser. Whitespace between
//! tokens is insignificant.

use std::{iter::Peekable, str::CharIndices};

use crate::{error::LexError, model::ComparisonOperator};

/// Characters that end a bare word.
const RESERVED: &[char] = &['\'', '"', '(', ')', ';', ',', '=', '!', '<', '>', '~'];

/// A token in the RSQL language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An unquoted word: a selector or a bare value.
    Word(String),

    /// A quoted value (quotes stripped, escapes resolved).
    Quoted(String),

    /// A comparison operator (`==`, `!=`, `<`, `=lt=`, …).
    Comparison(ComparisonOperator),

    /// `;`
    And,

    /// `,`
    Or,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,
}

/// A token with the byte range it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// Tokenizes an RSQL expression.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.input.len(), |&(index, _)| index)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.offset();
            let Some(token) = self.next_token()? else {
                break;
            };
            let end = self.offset();
            tokens.push(SpannedToken { token, start, end });
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let Some(&(start, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '\'' | '"' => self.read_quoted(ch)?,
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            ';' => self.single(Token::And),
            ',' => self.single(Token::Or),
            '=' => self.read_equals()?,
            '!' => {
                self.advance();
                if !self.eat('=') {
                    return Err(self.error_at("expected '=' after '!'", start));
                }
                Token::Comparison(ComparisonOperator::NotEqual)
            }
            '<' => {
                self.advance();
                if self.eat('=') {
                    Token::Comparison(ComparisonOperator::LessOrEqual)
                } else {
                    Token::Comparison(ComparisonOperator::Less)
                }
            }
            '>' => {
                self.advance();
                if self.eat('=') {
                    Token::Comparison(ComparisonOperator::GreaterOrEqual)
                } else {
                    Token::Comparison(ComparisonOperator::Greater)
                }
            }
            '~' => return Err(self.error_at("unexpected character '~'", start)),
            _ => self.read_word(),
        };

        Ok(Some(token))
    }

    /// Consumes one character and returns `token`.
    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Reads `==` or a FIQL alias such as `=ge=`.
    fn read_equals(&mut self) -> Result<Token, LexError> {
        let start = self.offset();
        self.advance(); // consume '='

        if self.eat('=') {
            return Ok(Token::Comparison(ComparisonOperator::Equal));
        }

        let mut name = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if !ch.is_ascii_alphabetic() {
                break;
            }
            name.push(ch);
            self.advance();
        }

        if name.is_empty() || !self.eat('=') {
            return Err(self.error_at("expected comparison operator after '='", start));
        }

        ComparisonOperator::from_alias(&name)
            .map(Token::Comparison)
            .ok_or_else(|| {
                self.error_at(
                    format!("unsupported comparison operator '={name}='"),
                    start,
                )
            })
    }

    /// Reads a value quoted with `quote`, resolving backslash escapes.
    fn read_quoted(&mut self, quote: char) -> Result<Token, LexError> {
        let start = self.offset();
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.next() {
                Some((_, ch)) if ch == quote => return Ok(Token::Quoted(content)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => content.push(escaped),
                    None => return Err(self.error_at("unclosed quote", start)),
                },
                Some((_, ch)) => content.push(ch),
                None => return Err(self.error_at("unclosed quote", start)),
            }
        }
    }

    /// Reads an unquoted word.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(&(_, ch)) = self.chars.peek() {
            if !is_word_char(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }

        Token::Word(word)
    }

    /// Consumes the next character if it is `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|&(_, ch)| ch == expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|&(_, ch)| ch.is_whitespace()) {
            self.advance();
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        self.chars.next();
    }
}

/// Whether `ch` can appear in a bare word.
fn is_word_char(ch: char) -> bool {
    !ch.is_whitespace() && !RESERVED.contains(&ch)
}

/// Whether `name` reads back as a single bare word, so it can stand as a field name.
pub fn is_selector(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_word_char)
}

/// Tokenizes an expression, keeping the byte span of every token.
pub fn tokenize_spanned(input: &str) -> Result<Vec<SpannedToken>, LexError> {
    Lexer::new(input).tokenize()
}

/// Convenience function to tokenize an expression.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Ok(tokenize_spanned(input)?
        .into_iter()
        .map(|spanned| spanned.token)
        .collect())
}
