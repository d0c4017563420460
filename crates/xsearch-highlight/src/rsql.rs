//! Token colouring for RSQL expressions.

use xsearch_query::{SpannedToken, Token, tokenize_spanned};

use crate::colors;

/// Colours an RSQL expression token by token.
///
/// Selectors are cyan, comparators yellow, values green, logic operators bold and parentheses
/// dim. Text between tokens is kept as written. Input that does not tokenize is returned
/// unchanged.
pub fn rsql(input: &str) -> String {
    let Ok(tokens) = tokenize_spanned(input) else {
        return input.to_string();
    };

    let mut out = String::with_capacity(input.len() * 2);
    let mut cursor = 0;
    for (i, spanned) in tokens.iter().enumerate() {
        out.push_str(&input[cursor..spanned.start]);
        let style = style_for(spanned, tokens.get(i + 1));
        out.push_str(style);
        out.push_str(&input[spanned.start..spanned.end]);
        out.push_str(colors::RESET);
        cursor = spanned.end;
    }
    out.push_str(&input[cursor..]);
    out
}

/// Escape sequence for a token; a word is a selector when a comparator follows it.
fn style_for(spanned: &SpannedToken, next: Option<&SpannedToken>) -> &'static str {
    match spanned.token {
        Token::Word(_) if next.is_some_and(|n| matches!(n.token, Token::Comparison(_))) => {
            colors::CYAN
        }
        Token::Word(_) | Token::Quoted(_) => colors::GREEN,
        Token::Comparison(_) => colors::YELLOW,
        Token::And | Token::Or => colors::BOLD,
        Token::LParen | Token::RParen => colors::DIM,
    }
}
