//! Expression parsing for arithmos.
//!
//! A submission string passes through three stages: the tokenizer
//! ([`tokenize`]), shunting-yard conversion to postfix ([`to_postfix`]),
//! and task-DAG emission ([`build_plan`]). Validation happens on the same
//! postfix sequence via direct evaluation ([`evaluate_postfix`]), so the
//! whole pipeline runs shunting-yard exactly once while classifying errors
//! the same way a stand-alone calculator would.

pub mod plan;
pub mod rpn;
pub mod token;

pub use plan::build_plan;
pub use rpn::{evaluate, evaluate_postfix, to_postfix};
pub use token::{Token, tokenize};

use arithmos_core::config::OperationTimings;
use arithmos_core::{ParseError, Task};

/// Parse a submission into a ready-to-install task list.
///
/// The returned list is in emission order; the LAST task is the root
/// whose result is the expression's final value. The postfix sequence is
/// validated by direct evaluation first, so errors such as division by
/// zero are classified before any task id is allocated.
pub fn parse_expression(source: &str, timings: &OperationTimings) -> Result<Vec<Task>, ParseError> {
    let tokens = tokenize(source)?;
    let postfix = to_postfix(tokens)?;
    evaluate_postfix(&postfix)?;
    build_plan(&postfix, timings)
}

#[cfg(test)]
mod tests {
    use arithmos_core::{Op, Operand};

    use super::*;

    fn parse(source: &str) -> Result<Vec<Task>, ParseError> {
        parse_expression(source, &OperationTimings::default())
    }

    #[test]
    fn test_boundary_classification() {
        assert_eq!(parse(""), Err(ParseError::EmptyExpression));
        assert_eq!(parse("   "), Err(ParseError::EmptyExpression));
        assert_eq!(parse("(2+2"), Err(ParseError::MismatchedParentheses));
        assert_eq!(parse("2+a"), Err(ParseError::InvalidCharacter('a')));
        assert_eq!(parse("2/0"), Err(ParseError::DivisionByZero));
        assert_eq!(parse("2+"), Err(ParseError::InvalidExpression));
    }

    #[test]
    fn test_unary_minus_is_rejected() {
        assert_eq!(parse("-3"), Err(ParseError::InvalidExpression));
    }

    #[test]
    fn test_single_binary_operation() {
        let tasks = parse("2+3").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].op, Op::Add);
        assert_eq!(tasks[0].args, [Operand::Literal(2.0), Operand::Literal(3.0)]);
        assert!(tasks[0].depends_on.is_empty());
    }

    #[test]
    fn test_dependency_edges_follow_operand_order() {
        // 2+3*4 emits the multiplication first; the addition's second
        // slot waits on it.
        let tasks = parse("2+3*4").unwrap();
        assert_eq!(tasks.len(), 2);

        let mul = &tasks[0];
        let add = &tasks[1];
        assert_eq!(mul.op, Op::Mul);
        assert_eq!(mul.args, [Operand::Literal(3.0), Operand::Literal(4.0)]);
        assert_eq!(add.op, Op::Add);
        assert_eq!(add.args, [Operand::Literal(2.0), Operand::Pending]);
        assert_eq!(add.depends_on, vec![mul.id]);
    }

    #[test]
    fn test_latencies_come_from_config() {
        let timings = OperationTimings {
            add_ms: 1,
            sub_ms: 2,
            mul_ms: 3,
            div_ms: 4,
        };
        let tasks = parse_expression("1+2*3-4/5", &timings).unwrap();
        for task in &tasks {
            let expected = match task.op {
                Op::Add => 1,
                Op::Sub => 2,
                Op::Mul => 3,
                Op::Div => 4,
                Op::Literal => 0,
            };
            assert_eq!(task.latency_ms, expected);
        }
    }

    #[test]
    fn test_literal_only_expression_emits_sentinel_task() {
        let tasks = parse("42").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].op, Op::Literal);
        assert_eq!(tasks[0].args[0], Operand::Literal(42.0));
        assert_eq!(tasks[0].latency_ms, 0);
    }

    #[test]
    fn test_root_is_last_and_unreferenced() {
        let tasks = parse("(2+3)*(4-1)/5").unwrap();
        let root = tasks.last().unwrap();
        for task in &tasks {
            assert!(!task.depends_on.contains(&root.id));
        }
        // Every non-root task is referenced exactly once.
        for task in &tasks[..tasks.len() - 1] {
            let referenced = tasks
                .iter()
                .flat_map(|t| t.depends_on.iter())
                .filter(|dep| **dep == task.id)
                .count();
            assert_eq!(referenced, 1);
        }
    }

    #[test]
    fn test_pending_slots_match_dependency_count() {
        for source in ["2+3", "2+3*4", "(2+3)*4", "1+2*3-4/2", "2*((3+2)*2)"] {
            for task in parse(source).unwrap() {
                assert_eq!(task.pending_slots(), task.depends_on.len());
            }
        }
    }

    // The canonical form of a parse is its postfix sequence joined by
    // spaces; feeding those tokens back through shunting-yard and
    // emission yields an isomorphic DAG.
    #[test]
    fn test_postfix_canonical_form_reparses_isomorphically() {
        let timings = OperationTimings::default();
        for source in ["2+3", "2+3*4", "2*(3*4)"] {
            let postfix = to_postfix(tokenize(source).unwrap()).unwrap();
            let canonical = postfix
                .iter()
                .map(Token::to_string)
                .collect::<Vec<_>>()
                .join(" ");

            let reparsed_tokens: Vec<Token> = canonical
                .split_whitespace()
                .map(|text| match Op::from_char(text.chars().next().unwrap()) {
                    Some(op) if text.len() == 1 => Token::Op(op),
                    _ => Token::Number(text.to_string()),
                })
                .collect();
            let reparsed_postfix = to_postfix(reparsed_tokens).unwrap();

            let original = build_plan(&postfix, &timings).unwrap();
            let reparsed = build_plan(&reparsed_postfix, &timings).unwrap();
            assert!(isomorphic(&original, &reparsed), "source: {source}");
        }
    }

    // Structural equality of two plans up to task-id renaming.
    fn isomorphic(a: &[Task], b: &[Task]) -> bool {
        a.len() == b.len() && shape(a, a.len() - 1) == shape(b, b.len() - 1)
    }

    fn shape(tasks: &[Task], index: usize) -> String {
        let task = &tasks[index];
        let mut deps = task.depends_on.iter();
        let mut parts = Vec::new();
        for slot in task.args {
            match slot {
                Operand::Literal(v) => parts.push(v.to_string()),
                Operand::Pending => {
                    let dep = deps.next().expect("dependency per pending slot");
                    let pos = tasks
                        .iter()
                        .position(|t| t.id == *dep)
                        .expect("dependency present in plan");
                    parts.push(shape(tasks, pos));
                }
            }
        }
        format!("({} {} {})", parts[0], task.op, parts[1])
    }
}
