//! Tokenizer for infix arithmetic expressions.

use std::fmt;

use arithmos_core::{Op, ParseError};

/// One lexical unit of a submission. Produced only by the tokenizer and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A digit run, optionally containing a decimal point, kept as the
    /// literal substring.
    Number(String),
    /// One of the four arithmetic operators.
    Op(Op),
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) => f.write_str(text),
            Token::Op(op) => op.fmt(f),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

/// Scan an ASCII submission left-to-right into tokens.
///
/// Spaces are stripped first. Unary signs and implicit multiplication are
/// not supported; `-3` tokenizes as an operator followed by a number and
/// fails later, during postfix evaluation.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let stripped: String = source.chars().filter(|c| *c != ' ').collect();
    if stripped.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    let mut tokens = Vec::new();
    let mut chars = stripped.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            '+' | '-' | '*' | '/' => {
                chars.next();
                let op = match c {
                    '+' => Op::Add,
                    '-' => Op::Sub,
                    '*' => Op::Mul,
                    _ => Op::Div,
                };
                tokens.push(Token::Op(op));
            }
            '0'..='9' => {
                let mut number = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        number.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(number));
            }
            other => return Err(ParseError::InvalidCharacter(other)),
        }
    }

    Ok(tokens)
}
