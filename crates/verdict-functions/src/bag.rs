//! `<type>-one-and-only`, `<type>-bag-size`, `<type>-is-in` and `<type>-bag`.

use verdict_contracts::{
    datatype::DataType,
    expression::{Bag, ExpressionResult},
    status::Status,
    value::AttributeValue,
};

use crate::argument::{bag_contains, boolean_result, expect_arity, FunctionArgument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BagOp {
    OneAndOnly,
    Size,
    IsIn,
    Bag,
}

impl BagOp {
    pub const ALL: [BagOp; 4] = [BagOp::OneAndOnly, BagOp::Size, BagOp::IsIn, BagOp::Bag];

    pub fn suffix(self) -> &'static str {
        match self {
            BagOp::OneAndOnly => "one-and-only",
            BagOp::Size => "bag-size",
            BagOp::IsIn => "is-in",
            BagOp::Bag => "bag",
        }
    }
}

pub(crate) fn evaluate(
    data_type: DataType,
    op: BagOp,
    args: &[FunctionArgument],
) -> Result<ExpressionResult, Status> {
    match op {
        BagOp::OneAndOnly => {
            expect_arity(args, 1)?;
            let bag = args[0].typed_bag(data_type)?;
            match bag.values() {
                [only] => Ok(ExpressionResult::Single(only.clone())),
                values => Err(Status::processing_error(format!(
                    "Expected 1 but Bag has {} elements",
                    values.len()
                ))),
            }
        }
        BagOp::Size => {
            // Element types are not checked.
            expect_arity(args, 1)?;
            let bag = args[0].bag()?;
            let size = i64::try_from(bag.len())
                .map_err(|_| Status::processing_error("Bag too large"))?;
            Ok(ExpressionResult::Single(AttributeValue::Integer(size)))
        }
        BagOp::IsIn => {
            expect_arity(args, 2)?;
            let value = args[0].simple(data_type)?;
            let bag = args[1].typed_bag(data_type)?;
            Ok(boolean_result(bag_contains(bag, value)))
        }
        BagOp::Bag => {
            let values = args
                .iter()
                .map(|arg| arg.simple(data_type).cloned())
                .collect::<Result<Bag, Status>>()?;
            Ok(ExpressionResult::Bag(values))
        }
    }
}
