//! `<type>-equal` and the ordering predicates.

use std::cmp::Ordering;

use verdict_contracts::{
    datatype::DataType, expression::ExpressionResult, status::Status, value::AttributeValue,
};

use crate::argument::{boolean_result, expect_arity, values_equal, FunctionArgument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Comparison {
    pub const ALL: [Comparison; 4] = [
        Comparison::GreaterThan,
        Comparison::GreaterThanOrEqual,
        Comparison::LessThan,
        Comparison::LessThanOrEqual,
    ];

    /// Datatypes with a total order the ordering functions accept.
    pub const ORDERED_TYPES: [DataType; 3] = [DataType::Integer, DataType::Double, DataType::String];

    pub fn suffix(self) -> &'static str {
        match self {
            Comparison::GreaterThan => "greater-than",
            Comparison::GreaterThanOrEqual => "greater-than-or-equal",
            Comparison::LessThan => "less-than",
            Comparison::LessThanOrEqual => "less-than-or-equal",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::GreaterThan => ordering == Ordering::Greater,
            Comparison::GreaterThanOrEqual => ordering != Ordering::Less,
            Comparison::LessThan => ordering == Ordering::Less,
            Comparison::LessThanOrEqual => ordering != Ordering::Greater,
        }
    }
}

pub(crate) fn equal(data_type: DataType, args: &[FunctionArgument]) -> Result<ExpressionResult, Status> {
    expect_arity(args, 2)?;
    let a = args[0].simple(data_type)?;
    let b = args[1].simple(data_type)?;
    Ok(boolean_result(values_equal(a, b)))
}

pub(crate) fn compare(
    data_type: DataType,
    comparison: Comparison,
    args: &[FunctionArgument],
) -> Result<ExpressionResult, Status> {
    expect_arity(args, 2)?;
    let a = args[0].simple(data_type)?;
    let b = args[1].simple(data_type)?;
    let ordering = match (a, b) {
        (AttributeValue::Integer(x), AttributeValue::Integer(y)) => Some(x.cmp(y)),
        (AttributeValue::Double(x), AttributeValue::Double(y)) => x.partial_cmp(y),
        (AttributeValue::String(x), AttributeValue::String(y)) => Some(x.cmp(y)),
        _ => None,
    };
    let ordering = ordering
        .ok_or_else(|| Status::processing_error(format!("Cannot order '{}' and '{}'", a, b)))?;
    Ok(boolean_result(comparison.holds(ordering)))
}
