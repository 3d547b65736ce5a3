//! Tokenizer for interpolation expressions.

use crate::error::{TemplateError, TemplateResult};

/// A token produced by the expression tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    This,

    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Question,
    Colon,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AmpAmp,
    PipePipe,

    Eof,
}

/// Tokenize an expression source string.
pub fn tokenize(source: &str) -> TemplateResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = source.chars().collect();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(pos + 1).is_some_and(|d| d.is_ascii_digit()))
        {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                pos += 1;
            }
            let text: String = chars[start..pos].iter().collect();
            let number = text.parse::<f64>().map_err(|_| TemplateError::Parse {
                message: format!("Invalid number literal: {}", text),
            })?;
            tokens.push(Token::Number(number));
            continue;
        }

        if c == '\'' || c == '"' {
            tokens.push(Token::Str(lex_string(&chars, &mut pos, c)?));
            continue;
        }

        if c.is_alphabetic() || c == '_' || c == '$' {
            let start = pos;
            while pos < chars.len()
                && (chars[pos].is_alphanumeric() || chars[pos] == '_' || chars[pos] == '$')
            {
                pos += 1;
            }
            let text: String = chars[start..pos].iter().collect();
            tokens.push(match text.as_str() {
                "true" => Token::True,
                "false" => Token::False,
                "null" | "undefined" => Token::Null,
                "this" => Token::This,
                _ => Token::Ident(text),
            });
            continue;
        }

        // Two-character operators first
        let next = chars.get(pos + 1).copied();
        let two = match (c, next) {
            ('=', Some('=')) => Some(Token::EqEq),
            ('!', Some('=')) => Some(Token::Ne),
            ('<', Some('=')) => Some(Token::Le),
            ('>', Some('=')) => Some(Token::Ge),
            ('&', Some('&')) => Some(Token::AmpAmp),
            ('|', Some('|')) => Some(Token::PipePipe),
            _ => None,
        };
        if let Some(token) = two {
            // Tolerate the strict-equality spellings === and !==
            if pos + 2 < chars.len()
                && chars[pos + 2] == '='
                && matches!(chars[pos], '=' | '!')
            {
                pos += 1;
            }
            tokens.push(token);
            pos += 2;
            continue;
        }

        let single = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '.' => Token::Dot,
            ',' => Token::Comma,
            '?' => Token::Question,
            ':' => Token::Colon,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '!' => Token::Bang,
            '<' => Token::Lt,
            '>' => Token::Gt,
            _ => {
                return Err(TemplateError::Parse {
                    message: format!("Unexpected character in expression: {:?}", c),
                });
            }
        };
        tokens.push(single);
        pos += 1;
    }

    tokens.push(Token::Eof);
    Ok(tokens)
}

/// Lex a quoted string literal. `pos` is on the opening quote.
fn lex_string(chars: &[char], pos: &mut usize, quote: char) -> TemplateResult<String> {
    let mut text = String::new();
    *pos += 1;

    while *pos < chars.len() {
        let c = chars[*pos];
        if c == quote {
            *pos += 1;
            return Ok(text);
        }
        if c == '\\' {
            *pos += 1;
            let escaped = chars.get(*pos).ok_or_else(|| TemplateError::Parse {
                message: "Unterminated string literal".to_string(),
            })?;
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => *other,
            });
            *pos += 1;
            continue;
        }
        text.push(c);
        *pos += 1;
    }

    Err(TemplateError::Parse {
        message: "Unterminated string literal".to_string(),
    })
}
