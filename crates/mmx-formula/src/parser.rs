//! Recursive-descent parser for the formula grammar.
//!
//! ```text
//! formula := expr EOF
//! expr    := IDENT '(' expr (',' NUMBER)* ')'
//!          | IDENT
//! ```
//!
//! The parser never fails outright. Anything it has to skip or imply is
//! recorded as a [`Diagnostic`]; [`crate::parse`] ignores diagnostics while
//! [`crate::validate`] reports the first one.

use crate::function::Function;
use crate::lexer::{Token, TokenKind, tokenize};

/// Calls nested deeper than this are treated as malformed.
pub const MAX_NESTING: usize = 64;

/// A recoverable syntax problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub offset: usize,
    pub message: String,
}

/// A numeric argument after the wrapped expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Number { value: f64, raw: String },
    Invalid { raw: String },
}

impl Arg {
    pub fn raw(&self) -> &str {
        match self {
            Arg::Number { raw, .. } | Arg::Invalid { raw } => raw,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Arg::Number { value, .. } => Some(*value),
            Arg::Invalid { .. } => None,
        }
    }

    /// Integer period literal (digits only).
    pub fn periods(&self) -> Option<u32> {
        match self {
            Arg::Number { raw, .. } if raw.chars().all(|c| c.is_ascii_digit()) => {
                raw.parse().ok()
            }
            _ => None,
        }
    }
}

/// A function call wrapping the base variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Name as written.
    pub name: String,
    /// `None` for names outside the vocabulary.
    pub function: Option<Function>,
    pub args: Vec<Arg>,
    pub offset: usize,
    pub closed: bool,
}

impl Call {
    /// True when the argument count matches the function's signature.
    pub fn has_expected_arity(&self) -> bool {
        self.function
            .is_some_and(|f| f.param_count() == self.args.len())
    }
}

/// Parse result: the base variable and its wrappers, innermost first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaSyntax {
    pub variable: Option<String>,
    pub variable_offset: usize,
    pub calls: Vec<Call>,
    pub diagnostics: Vec<Diagnostic>,
    /// Nesting exceeded [`MAX_NESTING`]; the call chain is incomplete.
    pub too_deep: bool,
}

/// Parse a formula into its call chain.
pub fn parse_syntax(source: &str) -> FormulaSyntax {
    let tokens = tokenize(source);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: source.len(),
        diagnostics: Vec::new(),
        too_deep: false,
    };
    let mut calls = Vec::new();
    let variable = parser.expr(&mut calls, 0);

    if variable.is_some()
        && let Some(token) = parser.peek().cloned()
    {
        parser.diagnostic(
            token.offset,
            format!(
                "Unexpected trailing input '{}' at position {}",
                token.text(),
                token.offset
            ),
        );
    }

    let (variable, variable_offset) = match variable {
        Some((name, offset)) => (Some(name), offset),
        None => (None, 0),
    };

    FormulaSyntax {
        variable,
        variable_offset,
        calls,
        diagnostics: parser.diagnostics,
        too_deep: parser.too_deep,
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    end: usize,
    diagnostics: Vec<Diagnostic>,
    too_deep: bool,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn diagnostic(&mut self, offset: usize, message: String) {
        self.diagnostics.push(Diagnostic { offset, message });
    }

    fn unexpected(&mut self, token: &Token) {
        self.diagnostic(
            token.offset,
            format!("Unexpected '{}' at position {}", token.text(), token.offset),
        );
    }

    /// Parse one expression, pushing its calls innermost-first onto `calls`.
    ///
    /// Returns the base variable and its offset.
    fn expr(&mut self, calls: &mut Vec<Call>, depth: usize) -> Option<(String, usize)> {
        if depth > MAX_NESTING {
            let offset = self.peek().map_or(self.end, |t| t.offset);
            self.diagnostic(offset, format!("Formula nests deeper than {MAX_NESTING} calls"));
            self.too_deep = true;
            return None;
        }

        let (name, offset) = loop {
            let token = self.peek()?.clone();
            match token.kind {
                TokenKind::Ident(name) => {
                    self.pos += 1;
                    break (name, token.offset);
                }
                TokenKind::RParen | TokenKind::Comma if depth > 0 => return None,
                _ => {
                    self.unexpected(&token);
                    self.pos += 1;
                }
            }
        };

        if self.peek_kind() != Some(&TokenKind::LParen) {
            return Some((name, offset));
        }
        self.pos += 1;

        let inner = self.expr(calls, depth + 1);
        if inner.is_none() {
            self.diagnostic(offset, format!("Function '{name}' is missing its argument"));
        }

        self.skip_to_separator();
        let mut args = Vec::new();
        while self.peek_kind() == Some(&TokenKind::Comma) {
            self.pos += 1;
            args.push(self.arg());
        }

        let closed = if self.peek_kind() == Some(&TokenKind::RParen) {
            self.pos += 1;
            true
        } else {
            self.diagnostic(self.end, format!("Missing ')' for '{name}'"));
            false
        };

        match inner {
            Some(variable) => {
                calls.push(Call {
                    function: name.parse::<Function>().ok(),
                    name,
                    args,
                    offset,
                    closed,
                });
                Some(variable)
            }
            // `log()` names no variable; fall back to the identifier itself.
            None => Some((name, offset)),
        }
    }

    /// Parse a numeric argument, consuming up to the next `,` or `)`.
    fn arg(&mut self) -> Arg {
        if let Some(TokenKind::Number(raw)) = self.peek_kind().cloned() {
            self.pos += 1;
            if matches!(
                self.peek_kind(),
                None | Some(TokenKind::Comma | TokenKind::RParen)
            ) && let Ok(value) = raw.parse::<f64>()
                && value.is_finite()
            {
                return Arg::Number { value, raw };
            }
            let rest = self.collect_to_separator();
            return Arg::Invalid { raw: raw + &rest };
        }
        Arg::Invalid {
            raw: self.collect_to_separator(),
        }
    }

    /// Consume tokens up to the next top-level `,` or `)`, returning their text.
    fn collect_to_separator(&mut self) -> String {
        let mut raw = String::new();
        let mut nested = 0usize;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Comma | TokenKind::RParen if nested == 0 => break,
                TokenKind::LParen => nested += 1,
                TokenKind::RParen => nested -= 1,
                _ => {}
            }
            raw.push_str(&token.text());
            self.pos += 1;
        }
        raw
    }

    /// Skip stray tokens between a wrapped expression and its arguments.
    fn skip_to_separator(&mut self) {
        let start = self.pos;
        let skipped = self.collect_to_separator();
        if !skipped.is_empty() {
            let token = self.tokens[start].clone();
            self.unexpected(&token);
        }
    }
}
