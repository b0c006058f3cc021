//! `string-normalize-space` and `string-normalize-to-lower-case`.

use verdict_contracts::{expression::ExpressionResult, status::Status, value::AttributeValue};

use crate::argument::{expect_arity, FunctionArgument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizeOp {
    Space,
    ToLowerCase,
}

impl NormalizeOp {
    pub const ALL: [NormalizeOp; 2] = [NormalizeOp::Space, NormalizeOp::ToLowerCase];

    pub fn name(self) -> &'static str {
        match self {
            NormalizeOp::Space => "string-normalize-space",
            NormalizeOp::ToLowerCase => "string-normalize-to-lower-case",
        }
    }
}

pub(crate) fn evaluate(op: NormalizeOp, args: &[FunctionArgument]) -> Result<ExpressionResult, Status> {
    expect_arity(args, 1)?;
    let s = args[0].string()?;
    let normalized = match op {
        // Leading and trailing characters up to U+0020; non-ASCII spaces are content.
        NormalizeOp::Space => s.trim_matches(|c: char| c <= ' ').to_string(),
        NormalizeOp::ToLowerCase => s.to_lowercase(),
    };
    Ok(ExpressionResult::Single(AttributeValue::String(normalized)))
}
