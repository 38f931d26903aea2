//! Tokenizer for formula strings.

/// Token category.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `[A-Za-z_][A-Za-z0-9_.]*`
    Ident(String),
    /// Unsigned numeric literal, kept as written.
    Number(String),
    LParen,
    RParen,
    Comma,
    /// Any other non-whitespace character.
    Other(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source formula.
    pub offset: usize,
}

impl Token {
    /// Source text of the token.
    pub fn text(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) | TokenKind::Number(s) => s.clone(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Other(c) => c.to_string(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Split a formula into tokens. Never fails; unknown characters become
/// [`TokenKind::Other`].
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = if is_ident_start(c) {
            let mut ident = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if !is_ident_continue(c) {
                    break;
                }
                ident.push(c);
                chars.next();
            }
            TokenKind::Ident(ident)
        } else if c.is_ascii_digit() || c == '.' {
            let mut number = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if !(c.is_ascii_digit() || c == '.') {
                    break;
                }
                number.push(c);
                chars.next();
            }
            TokenKind::Number(number)
        } else {
            chars.next();
            match c {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ',' => TokenKind::Comma,
                other => TokenKind::Other(other),
            }
        };

        tokens.push(Token { kind, offset });
    }

    tokens
}
