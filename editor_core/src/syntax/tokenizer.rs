//! Line tokenizer for the relational algebra query language.
//!
//! The tokenizer keeps no state between lines, so any line (or any suffix of
//! a line) can be lexed on its own.

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Angle-bracketed operator glyph such as `<S>` or `<X>`.
    Keyword,
    /// `->` and the comparison/logical symbols.
    Operator,
    /// Single-quoted literal.
    String,
    /// Decimal digits.
    Number,
    /// Relation or attribute name.
    Identifier,
    /// Anything else; not highlighted.
    None,
}

/// A classified lexeme. `start` and `len` count characters from the start of
/// the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub len: usize,
}

impl Token {
    /// Character offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Classifies the lexeme at the start of `rest`.
///
/// Returns the token kind and the number of characters it consumes, which is
/// at least one. Returns `None` only for empty input.
pub fn next_token(rest: &str) -> Option<(TokenKind, usize)> {
    let mut chars = rest.chars();
    let first = chars.next()?;
    let second = chars.clone().next();

    if first == '<' {
        let inner = chars.clone().take_while(|&c| c != '>').count();
        let closed = chars.clone().nth(inner) == Some('>');
        if inner > 0 && closed {
            return Some((TokenKind::Keyword, inner + 2));
        }
    }

    if first == '-' && second == Some('>') {
        return Some((TokenKind::Operator, 2));
    }

    match first {
        '=' | '<' | '>' | '!' => {
            let len = if second == Some('=') { 2 } else { 1 };
            return Some((TokenKind::Operator, len));
        }
        '&' | '|' | '~' => return Some((TokenKind::Operator, 1)),
        _ => {}
    }

    if first == '\'' {
        // An unterminated literal runs to the end of the line.
        let body = chars.clone().take_while(|&c| c != '\'').count();
        let closed = chars.nth(body) == Some('\'');
        let len = if closed { body + 2 } else { body + 1 };
        return Some((TokenKind::String, len));
    }

    if first.is_ascii_digit() {
        let len = 1 + chars.take_while(|c| c.is_ascii_digit()).count();
        return Some((TokenKind::Number, len));
    }

    if first.is_ascii_alphabetic() || first == '_' {
        let len = 1 + chars
            .take_while(|&c| c.is_ascii_alphanumeric() || c == '_')
            .count();
        return Some((TokenKind::Identifier, len));
    }

    Some((TokenKind::None, 1))
}

/// Iterator over the tokens of one line.
#[derive(Debug, Clone)]
pub struct LineTokens<'a> {
    rest: &'a str,
    column: usize,
}

impl<'a> Iterator for LineTokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, len) = next_token(self.rest)?;
        let byte_len = self
            .rest
            .char_indices()
            .nth(len)
            .map_or(self.rest.len(), |(idx, _)| idx);
        self.rest = &self.rest[byte_len..];

        let token = Token {
            kind,
            start: self.column,
            len,
        };
        self.column += len;
        Some(token)
    }
}

/// Returns an iterator over the tokens of `line`.
pub fn tokens(line: &str) -> LineTokens<'_> {
    LineTokens {
        rest: line,
        column: 0,
    }
}

/// Tokenizes a whole line, including unhighlighted `None` tokens.
pub fn tokenize_line(line: &str) -> Vec<Token> {
    tokens(line).collect()
}
