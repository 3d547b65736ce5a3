//! Template compilation.
//!
//! This module splits template source into literal and interpolation
//! segments and parses each interpolation into an expression AST with a
//! small precedence-climbing parser.

use crate::ast::{BinaryOp, Expr, Segment, UnaryOp};
use crate::error::{TemplateError, TemplateResult};
use crate::lexer::{Token, tokenize};

/// A compiled template ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The parsed template segments.
    pub(crate) segments: Vec<Segment>,

    /// Original source (for error reporting).
    pub(crate) source: String,
}

impl Template {
    /// Compile a template from source text.
    ///
    /// Recognized interpolation delimiters are `${...}` and `<%= ... %>`.
    /// Everything else is literal text; `\${` escapes to a literal `${`.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        let segments = split_segments(source)?;
        Ok(Template {
            segments,
            source: source.to_string(),
        })
    }

    /// Get the segments of this template.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this template contains any interpolations.
    ///
    /// A template without interpolations renders byte-identical to its
    /// source, so callers can skip rendering entirely.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }
}

/// Split template source into literal and interpolation segments.
fn split_segments(source: &str) -> TemplateResult<Vec<Segment>> {
    let chars: Vec<char> = source.chars().collect();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while pos < chars.len() {
        // Backslash escape for the ES-style delimiter
        if chars[pos] == '\\' && starts_with(&chars, pos + 1, "${") {
            literal.push_str("${");
            pos += 3;
            continue;
        }

        if starts_with(&chars, pos, "${") {
            flush_literal(&mut segments, &mut literal);
            let (expr_source, end) = scan_braced(&chars, pos + 2, source)?;
            segments.push(Segment::Interpolation(parse_expression(&expr_source)?));
            pos = end;
            continue;
        }

        if starts_with(&chars, pos, "<%=") {
            flush_literal(&mut segments, &mut literal);
            let (expr_source, end) = scan_classic(&chars, pos + 3, source)?;
            segments.push(Segment::Interpolation(parse_expression(&expr_source)?));
            pos = end;
            continue;
        }

        literal.push(chars[pos]);
        pos += 1;
    }

    flush_literal(&mut segments, &mut literal);
    Ok(segments)
}

fn flush_literal(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn starts_with(chars: &[char], pos: usize, needle: &str) -> bool {
    needle
        .chars()
        .enumerate()
        .all(|(i, c)| chars.get(pos + i) == Some(&c))
}

/// Scan to the `}` closing a `${` interpolation.
///
/// Braces inside quoted string literals do not terminate the
/// interpolation.
fn scan_braced(chars: &[char], start: usize, source: &str) -> TemplateResult<(String, usize)> {
    let mut pos = start;
    let mut quote: Option<char> = None;

    while pos < chars.len() {
        let c = chars[pos];
        match quote {
            Some(q) => {
                if c == '\\' {
                    pos += 1; // skip the escaped character
                } else if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                } else if c == '}' {
                    let expr: String = chars[start..pos].iter().collect();
                    return Ok((expr, pos + 1));
                }
            }
        }
        pos += 1;
    }

    Err(TemplateError::Parse {
        message: format!("Unterminated interpolation in template: {:?}", source),
    })
}

/// Scan to the `%>` closing a `<%=` interpolation.
fn scan_classic(chars: &[char], start: usize, source: &str) -> TemplateResult<(String, usize)> {
    let mut pos = start;
    while pos < chars.len() {
        if starts_with(chars, pos, "%>") {
            let expr: String = chars[start..pos].iter().collect();
            return Ok((expr, pos + 2));
        }
        pos += 1;
    }

    Err(TemplateError::Parse {
        message: format!("Unterminated interpolation in template: {:?}", source),
    })
}

/// Parse a single expression from source text.
pub fn parse_expression(source: &str) -> TemplateResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = ExprParser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        self.pos += 1;
        token
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == token
    }

    fn expect(&mut self, token: &Token) -> TemplateResult<()> {
        if self.at(token) {
            self.advance();
            Ok(())
        } else {
            Err(TemplateError::Parse {
                message: format!("Expected {:?}, found {:?}", token, self.peek()),
            })
        }
    }

    fn expect_eof(&self) -> TemplateResult<()> {
        if self.at(&Token::Eof) {
            Ok(())
        } else {
            Err(TemplateError::Parse {
                message: format!("Unexpected trailing token: {:?}", self.peek()),
            })
        }
    }

    /// Entry point: ternary has the lowest precedence.
    fn parse_expr(&mut self) -> TemplateResult<Expr> {
        let cond = self.parse_binary(0)?;

        if self.at(&Token::Question) {
            self.advance();
            let then = self.parse_expr()?;
            self.expect(&Token::Colon)?;
            let otherwise = self.parse_expr()?;
            return Ok(Expr::Ternary {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            });
        }

        Ok(cond)
    }

    fn parse_binary(&mut self, min_prec: u8) -> TemplateResult<Expr> {
        let mut left = self.parse_unary()?;

        while let Some((op, prec)) = binary_op_info(self.peek()) {
            if prec < min_prec {
                break;
            }
            self.advance();
            // All operators are left-associative
            let right = self.parse_binary(prec + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> TemplateResult<Expr> {
        match self.peek() {
            Token::Bang => {
                self.advance();
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(self.parse_unary()?),
                })
            }
            Token::Minus => {
                self.advance();
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    expr: Box::new(self.parse_unary()?),
                })
            }
            _ => self.parse_postfix(),
        }
    }

    /// Parse a primary expression followed by member/index accesses.
    fn parse_postfix(&mut self) -> TemplateResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek() {
                Token::Dot => {
                    self.advance();
                    let field = match self.advance() {
                        Token::Ident(name) => name,
                        other => {
                            return Err(TemplateError::Parse {
                                message: format!("Expected field name after '.', found {:?}", other),
                            });
                        }
                    };
                    expr = Expr::Member {
                        object: Box::new(expr),
                        field,
                    };
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&Token::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> TemplateResult<Expr> {
        match self.advance() {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Str(s) => Ok(Expr::Str(s)),
            Token::True => Ok(Expr::Bool(true)),
            Token::False => Ok(Expr::Bool(false)),
            Token::Null => Ok(Expr::Null),
            Token::This => Ok(Expr::This),
            Token::Ident(name) => Ok(Expr::Ident(name)),
            Token::LParen => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            other => Err(TemplateError::Parse {
                message: format!("Unexpected token in expression: {:?}", other),
            }),
        }
    }
}

fn binary_op_info(token: &Token) -> Option<(BinaryOp, u8)> {
    let (op, prec) = match token {
        Token::PipePipe => (BinaryOp::Or, 1),
        Token::AmpAmp => (BinaryOp::And, 2),
        Token::EqEq => (BinaryOp::Eq, 3),
        Token::Ne => (BinaryOp::Ne, 3),
        Token::Lt => (BinaryOp::Lt, 4),
        Token::Le => (BinaryOp::Le, 4),
        Token::Gt => (BinaryOp::Gt, 4),
        Token::Ge => (BinaryOp::Ge, 4),
        Token::Plus => (BinaryOp::Add, 5),
        Token::Minus => (BinaryOp::Sub, 5),
        Token::Star => (BinaryOp::Mul, 6),
        Token::Slash => (BinaryOp::Div, 6),
        Token::Percent => (BinaryOp::Rem, 6),
        _ => return None,
    };
    Some((op, prec))
}
