//! `or`, `and`, `n-of` and `not`.
//!
//! `or`, `and` and `n-of` scan left to right and stop at the first decisive
//! argument, so arguments after it are never validated.

use verdict_contracts::{expression::ExpressionResult, status::Status};

use crate::argument::{boolean_result, expect_arity, expect_min_arity, FunctionArgument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    Or,
    And,
    NOf,
    Not,
}

impl LogicalOp {
    pub const ALL: [LogicalOp; 4] = [LogicalOp::Or, LogicalOp::And, LogicalOp::NOf, LogicalOp::Not];

    pub fn name(self) -> &'static str {
        match self {
            LogicalOp::Or => "or",
            LogicalOp::And => "and",
            LogicalOp::NOf => "n-of",
            LogicalOp::Not => "not",
        }
    }
}

pub(crate) fn evaluate(op: LogicalOp, args: &[FunctionArgument]) -> Result<ExpressionResult, Status> {
    let value = match op {
        LogicalOp::Or => {
            for arg in args {
                if arg.boolean()? {
                    return Ok(boolean_result(true));
                }
            }
            false
        }
        LogicalOp::And => {
            for arg in args {
                if !arg.boolean()? {
                    return Ok(boolean_result(false));
                }
            }
            true
        }
        LogicalOp::Not => {
            expect_arity(args, 1)?;
            !args[0].boolean()?
        }
        LogicalOp::NOf => n_of(args)?,
    };
    Ok(boolean_result(value))
}

fn n_of(args: &[FunctionArgument]) -> Result<bool, Status> {
    expect_min_arity(args, 1)?;
    let count = args[0].integer()?;
    if count < 0 {
        return Err(Status::processing_error(format!("Count must not be negative, got {}", count)));
    }
    let rest = &args[1..];
    if count as u64 > rest.len() as u64 {
        return Err(Status::processing_error(format!(
            "Expected {} arguments but only {} arguments in list after the count",
            count,
            rest.len()
        )));
    }

    if count == 0 {
        return Ok(true);
    }
    let mut found = 0;
    for arg in rest {
        if arg.boolean()? {
            found += 1;
            if found == count {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
