//! Shunting-yard conversion and direct postfix evaluation.

use arithmos_core::{Op, ParseError};

use crate::token::{Token, tokenize};

/// Convert an infix token sequence to postfix.
///
/// Standard shunting-yard with left-associative operators: an incoming
/// operator pops every stacked operator of greater or equal precedence.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::Op(op) => {
                while let Some(Token::Op(top)) = stack.last() {
                    if top.precedence() >= op.precedence() {
                        if let Some(popped) = stack.pop() {
                            output.push(popped);
                        }
                    } else {
                        break;
                    }
                }
                stack.push(Token::Op(op));
            }
            Token::LeftParen => stack.push(token),
            Token::RightParen => {
                let mut matched = false;
                while let Some(top) = stack.pop() {
                    if top == Token::LeftParen {
                        matched = true;
                        break;
                    }
                    output.push(top);
                }
                if !matched {
                    return Err(ParseError::MismatchedParentheses);
                }
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Token::LeftParen {
            return Err(ParseError::MismatchedParentheses);
        }
        output.push(top);
    }

    Ok(output)
}

/// Evaluate a postfix sequence directly.
///
/// This is the validation path: unlike workers, it reports division by
/// zero as an error instead of producing `0`.
pub fn evaluate_postfix(postfix: &[Token]) -> Result<f64, ParseError> {
    let mut stack: Vec<f64> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(text) => {
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidExpression)?;
                stack.push(value);
            }
            Token::Op(op) => {
                let right = stack.pop().ok_or(ParseError::InvalidExpression)?;
                let left = stack.pop().ok_or(ParseError::InvalidExpression)?;
                if *op == Op::Div && right == 0.0 {
                    return Err(ParseError::DivisionByZero);
                }
                stack.push(op.apply(left, right));
            }
            // Parentheses never survive conversion to postfix.
            _ => return Err(ParseError::InvalidExpression),
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(ParseError::InvalidExpression),
    }
}

/// Tokenize, convert, and evaluate a submission in one call.
pub fn evaluate(source: &str) -> Result<f64, ParseError> {
    let postfix = to_postfix(tokenize(source)?)?;
    evaluate_postfix(&postfix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postfix_text(source: &str) -> String {
        to_postfix(tokenize(source).unwrap())
            .unwrap()
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_precedence_ordering() {
        assert_eq!(postfix_text("2+3"), "2 3 +");
        assert_eq!(postfix_text("2+3*4"), "2 3 4 * +");
        assert_eq!(postfix_text("2*3+4"), "2 3 * 4 +");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(postfix_text("8-3-2"), "8 3 - 2 -");
        assert_eq!(postfix_text("8/4/2"), "8 4 / 2 /");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(postfix_text("(2+3)*4"), "2 3 + 4 *");
        assert_eq!(postfix_text("2*((3+2)*2)"), "2 3 2 + 2 * *");
    }

    #[test]
    fn test_mismatched_parentheses() {
        assert_eq!(
            to_postfix(tokenize("(2+2").unwrap()),
            Err(ParseError::MismatchedParentheses)
        );
        assert_eq!(
            to_postfix(tokenize("2+2)").unwrap()),
            Err(ParseError::MismatchedParentheses)
        );
    }

    #[test]
    fn test_evaluation() {
        assert_eq!(evaluate("2+3").unwrap(), 5.0);
        assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
        assert_eq!(evaluate("(2+3)*4").unwrap(), 20.0);
        assert_eq!(evaluate("1+2*3-4/2").unwrap(), 5.0);
        assert_eq!(evaluate("2+2+(3/3)").unwrap(), 5.0);
        assert_eq!(evaluate("2*((3+2)*2)").unwrap(), 20.0);
    }

    #[test]
    fn test_division_by_zero_is_an_error_here() {
        assert_eq!(evaluate("2/0"), Err(ParseError::DivisionByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(ParseError::DivisionByZero));
    }

    #[test]
    fn test_structural_failures() {
        assert_eq!(evaluate("2+"), Err(ParseError::InvalidExpression));
        assert_eq!(evaluate("(2)(3)"), Err(ParseError::InvalidExpression));
        assert_eq!(evaluate("1.2.3+1"), Err(ParseError::InvalidExpression));
    }
}
