//! Task-DAG emission from a postfix token sequence.

use arithmos_core::config::OperationTimings;
use arithmos_core::{Op, Operand, ParseError, Task, TaskId};

use crate::token::Token;

/// A value on the emission stack: either a number known at parse time or
/// the id of the task that will produce it.
enum Slot {
    Literal(f64),
    Pending(TaskId),
}

/// Walk a postfix sequence and emit one task per operator.
///
/// Tasks come out in emission order; the last one is the root. Operand
/// slots that reference an earlier task stay `Pending` and contribute an
/// entry to `depends_on` in operand order. A sequence consisting of a
/// single number emits one `literal` sentinel task instead; it still
/// travels through normal dispatch.
pub fn build_plan(postfix: &[Token], timings: &OperationTimings) -> Result<Vec<Task>, ParseError> {
    if let [Token::Number(text)] = postfix {
        let value = text
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidExpression)?;
        return Ok(vec![Task::literal(value)]);
    }

    let mut tasks = Vec::new();
    let mut stack: Vec<Slot> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(text) => {
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidExpression)?;
                stack.push(Slot::Literal(value));
            }
            Token::Op(op) => {
                let right = stack.pop().ok_or(ParseError::InvalidExpression)?;
                let left = stack.pop().ok_or(ParseError::InvalidExpression)?;

                let id = TaskId::new();
                let mut depends_on = Vec::new();
                let mut operand = |slot: Slot| match slot {
                    Slot::Literal(value) => Operand::Literal(value),
                    Slot::Pending(dep) => {
                        depends_on.push(dep);
                        Operand::Pending
                    }
                };
                let args = [operand(left), operand(right)];

                tasks.push(Task {
                    id,
                    op: *op,
                    args,
                    latency_ms: timings.latency_for(*op),
                    priority: op.priority(),
                    depends_on,
                });
                stack.push(Slot::Pending(id));
            }
            _ => return Err(ParseError::InvalidExpression),
        }
    }

    match stack.as_slice() {
        [Slot::Pending(_)] => Ok(tasks),
        _ => Err(ParseError::InvalidExpression),
    }
}

#[cfg(test)]
mod tests {
    use crate::rpn::to_postfix;
    use crate::token::tokenize;

    use super::*;

    fn plan(source: &str) -> Vec<Task> {
        let postfix = to_postfix(tokenize(source).unwrap()).unwrap();
        build_plan(&postfix, &OperationTimings::default()).unwrap()
    }

    #[test]
    fn test_both_operands_pending() {
        // (2+3)*(4-1): the product waits on both sides, left edge first.
        let tasks = plan("(2+3)*(4-1)");
        assert_eq!(tasks.len(), 3);

        let sum = &tasks[0];
        let diff = &tasks[1];
        let product = &tasks[2];
        assert_eq!(sum.op, Op::Add);
        assert_eq!(diff.op, Op::Sub);
        assert_eq!(product.op, Op::Mul);
        assert_eq!(product.args, [Operand::Pending, Operand::Pending]);
        assert_eq!(product.depends_on, vec![sum.id, diff.id]);
    }

    #[test]
    fn test_literal_zero_operand_stays_literal() {
        // 0-(2*3): the subtraction's first slot is a real zero, not a
        // placeholder.
        let tasks = plan("0-(2*3)");
        let sub = tasks.last().unwrap();
        assert_eq!(sub.op, Op::Sub);
        assert_eq!(sub.args, [Operand::Literal(0.0), Operand::Pending]);
        assert_eq!(sub.depends_on.len(), 1);
    }

    #[test]
    fn test_priorities_follow_operator_class() {
        for task in plan("1+2*3-4/2") {
            let expected = match task.op {
                Op::Mul | Op::Div => 2,
                _ => 1,
            };
            assert_eq!(task.priority.as_u8(), expected);
        }
    }

    #[test]
    fn test_operator_without_operands_fails() {
        let postfix = vec![Token::Op(Op::Add)];
        assert_eq!(
            build_plan(&postfix, &OperationTimings::default()),
            Err(ParseError::InvalidExpression)
        );
    }

    #[test]
    fn test_trailing_operand_fails() {
        // Postfix "2 3" leaves two slots on the stack.
        let postfix = vec![
            Token::Number("2".to_string()),
            Token::Number("3".to_string()),
        ];
        assert_eq!(
            build_plan(&postfix, &OperationTimings::default()),
            Err(ParseError::InvalidExpression)
        );
    }

    #[test]
    fn test_empty_postfix_fails() {
        assert_eq!(
            build_plan(&[], &OperationTimings::default()),
            Err(ParseError::InvalidExpression)
        );
    }
}
