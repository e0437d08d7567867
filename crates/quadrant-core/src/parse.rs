//! Expression parser.
//!
//! Accepts the Python-style syntax users type into the calculator:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('**' | '^') unary)?
//! primary := NUMBER | NAME | NAME '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! Unary minus binds looser than exponentiation, so `-x**2` is `-(x**2)`.
//! Decimal literals become exact rationals. There is no implicit
//! multiplication: `2x` is an error.

use thiserror::Error;

use crate::arena::ExprArena;
use crate::expr::{Constant, Func};
use crate::handle::ExprHandle;
use crate::number::Number;

/// Deepest nesting of parentheses, calls, signs and exponents accepted.
pub const MAX_NESTING: usize = 256;

/// Errors produced while parsing an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was empty or only whitespace.
    #[error("empty expression")]
    Empty,

    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar {
        /// The character.
        ch: char,
        /// Byte offset in the input.
        pos: usize,
    },

    /// A malformed numeric literal.
    #[error("invalid number '{text}' at position {pos}")]
    InvalidNumber {
        /// The literal as written.
        text: String,
        /// Byte offset in the input.
        pos: usize,
    },

    /// A token that does not fit the grammar at this point.
    #[error("unexpected '{found}' at position {pos}")]
    UnexpectedToken {
        /// The token as written.
        found: String,
        /// Byte offset in the input.
        pos: usize,
    },

    /// The input ended in the middle of an expression.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A call to a name that is not a known function.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Nesting deeper than [`MAX_NESTING`].
    #[error("expression nested more than {limit} levels deep at position {pos}")]
    TooDeep {
        /// The nesting limit.
        limit: usize,
        /// Byte offset in the input.
        pos: usize,
    },

    /// A known function called with the wrong number of arguments.
    #[error("{name}() takes {expected} argument(s), got {found}")]
    Arity {
        /// The function name.
        name: String,
        /// Accepted argument count, as text ("1" or "1 or 2").
        expected: &'static str,
        /// Supplied argument count.
        found: usize,
    },

    /// A constant used as a function.
    #[error("'{0}' is not callable")]
    NotCallable(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Number),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Name(name) => name.clone(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Power => "**".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Comma => ",".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                Token::Power
            }
            b'*' => Token::Star,
            b'^' => Token::Power,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b',' => Token::Comma,
            b'0'..=b'9' | b'.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // Exponent: 1e-3, 2E5
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        while j < bytes.len() && bytes[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let text = &input[start..i];
                let value = Number::from_decimal_str(text).ok_or_else(|| {
                    ParseError::InvalidNumber {
                        text: text.to_owned(),
                        pos: start,
                    }
                })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push((Token::Name(input[start..i].to_owned()), start));
                continue;
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(ParseError::UnexpectedChar { ch, pos: start });
            }
        };
        i += 1;
        tokens.push((token, start));
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
    arena: &'a mut ExprArena,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn unexpected(&self) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((t, at)) => ParseError::UnexpectedToken {
                found: t.text(),
                pos: *at,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, want: &Token) -> Result<(), ParseError> {
        if self.peek() == Some(want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expr(&mut self) -> Result<ExprHandle, ParseError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    lhs = self.arena.add(&[lhs, rhs]);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    lhs = self.arena.sub(lhs, rhs);
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> Result<ExprHandle, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    lhs = self.arena.mul(&[lhs, rhs]);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    lhs = self.arena.div(lhs, rhs);
                }
                _ => return Ok(lhs),
            }
        }
    }

    /// Every recursive rule passes through here, so this bounds the depth.
    fn unary(&mut self) -> Result<ExprHandle, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep {
                limit: MAX_NESTING,
                pos: self.tokens.get(self.pos).map_or(0, |(_, at)| *at),
            });
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<ExprHandle, ParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let inner = self.unary()?;
                Ok(self.arena.neg(inner))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<ExprHandle, ParseError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            let exp = self.unary()?;
            return Ok(self.arena.pow(base, exp));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<ExprHandle, ParseError> {
        let Some((token, at)) = self.next() else {
            return Err(ParseError::UnexpectedEnd);
        };
        match token {
            Token::Number(n) => Ok(self.arena.number(n)),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Name(name) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let args = self.arguments()?;
                    self.call(&name, &args)
                } else {
                    Ok(self.name(&name))
                }
            }
            other => Err(ParseError::UnexpectedToken {
                found: other.text(),
                pos: at,
            }),
        }
    }

    fn arguments(&mut self) -> Result<Vec<ExprHandle>, ParseError> {
        let mut args = vec![self.expr()?];
        while self.peek() == Some(&Token::Comma) {
            self.pos += 1;
            args.push(self.expr()?);
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }

    fn name(&mut self, name: &str) -> ExprHandle {
        match constant_named(name) {
            Some(c) => self.arena.constant(c),
            None => self.arena.symbol(name),
        }
    }

    fn call(&mut self, name: &str, args: &[ExprHandle]) -> Result<ExprHandle, ParseError> {
        if constant_named(name).is_some() {
            return Err(ParseError::NotCallable(name.to_owned()));
        }
        let arity = |expected: &'static str| ParseError::Arity {
            name: name.to_owned(),
            expected,
            found: args.len(),
        };
        match (name, args) {
            ("sqrt", [u]) => Ok(self.arena.sqrt(*u)),
            ("sqrt", _) => Err(arity("1")),
            ("log" | "ln", [u, base]) => {
                let num = self.arena.log(*u);
                let den = self.arena.log(*base);
                Ok(self.arena.div(num, den))
            }
            _ => match Func::from_name(name) {
                Some(func) => match args {
                    [u] => Ok(self.arena.func(func, *u)),
                    _ if func == Func::Log => Err(arity("1 or 2")),
                    _ => Err(arity("1")),
                },
                None => Err(ParseError::UnknownFunction(name.to_owned())),
            },
        }
    }
}

fn constant_named(name: &str) -> Option<Constant> {
    match name {
        "pi" => Some(Constant::Pi),
        "E" => Some(Constant::E),
        "oo" => Some(Constant::Infinity),
        _ => None,
    }
}

impl ExprArena {
    /// Parses `input` into a canonical expression.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first problem found.
    pub fn parse(&mut self, input: &str) -> Result<ExprHandle, ParseError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
            arena: self,
        };
        let expr = parser.expr()?;
        if parser.pos < parser.tokens.len() {
            return Err(parser.unexpected());
        }
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(input: &str) -> String {
        let mut arena = ExprArena::new();
        let h = arena.parse(input).unwrap();
        arena.to_text(h)
    }

    #[test]
    fn test_basic_expressions() {
        assert_eq!(text("x**2"), "x**2");
        assert_eq!(text("x^2 + 2*x + 1"), "x**2 + 2*x + 1");
        assert_eq!(text("sin(x)"), "sin(x)");
        assert_eq!(text("(x+1)*(x-1)"), "(x - 1)*(x + 1)");
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_eq!(text("-x**2"), "-x**2");
        assert_eq!(text("2**-1"), "1/2");
        assert_eq!(text("-2**2"), "-4");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(text("2**3**2"), "512");
    }

    #[test]
    fn test_decimals_are_exact() {
        assert_eq!(text("0.5*x"), "x/2");
        assert_eq!(text("1e-3"), "1/1000");
        assert_eq!(text("2.5"), "5/2");
    }

    #[test]
    fn test_constants_and_aliases() {
        assert_eq!(text("pi"), "pi");
        assert_eq!(text("ln(E)"), "1");
        assert_eq!(text("sqrt(4)"), "2");
        assert_eq!(text("abs(-3)"), "3");
        assert_eq!(text("log(8, 2)"), "log(8)/log(2)");
        assert_eq!(text("-oo"), "-oo");
    }

    #[test]
    fn test_errors() {
        let mut arena = ExprArena::new();
        assert_eq!(arena.parse("   "), Err(ParseError::Empty));
        assert_eq!(arena.parse("x +"), Err(ParseError::UnexpectedEnd));
        assert!(matches!(
            arena.parse("2x"),
            Err(ParseError::UnexpectedToken { pos: 1, .. })
        ));
        assert!(matches!(
            arena.parse("x $ 2"),
            Err(ParseError::UnexpectedChar { ch: '$', pos: 2 })
        ));
        assert_eq!(
            arena.parse("foo(x)"),
            Err(ParseError::UnknownFunction("foo".to_owned()))
        );
        assert_eq!(
            arena.parse("pi(2)"),
            Err(ParseError::NotCallable("pi".to_owned()))
        );
        assert!(matches!(arena.parse("sin(x, 2)"), Err(ParseError::Arity { .. })));
        assert!(matches!(arena.parse("1.2.3"), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(arena.parse("(x"), Err(ParseError::UnexpectedEnd)));
    }

    #[test]
    fn test_nesting_limit() {
        let mut arena = ExprArena::new();
        let deep = format!("{}x{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(
            arena.parse(&deep),
            Err(ParseError::TooDeep {
                limit: MAX_NESTING,
                pos: MAX_NESTING,
            })
        );

        let signs = format!("{}x", "-".repeat(20_000));
        assert!(matches!(arena.parse(&signs), Err(ParseError::TooDeep { .. })));
        let calls = format!("{}x{}", "sin(".repeat(5_000), ")".repeat(5_000));
        assert!(matches!(arena.parse(&calls), Err(ParseError::TooDeep { .. })));

        let shallow = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        let x = arena.symbol("x");
        assert_eq!(arena.parse(&shallow), Ok(x));
    }
}
