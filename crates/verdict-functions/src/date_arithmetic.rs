//! Adding and subtracting durations to dates and date-times.
//!
//! The result always carries the operand's timezone offset. Subtraction
//! negates the duration and adds. Day-time durations only combine with
//! date-times; year-month durations combine with both.

use verdict_contracts::{
    datatype::DataType, expression::ExpressionResult, status::Status, value::AttributeValue,
};

use crate::argument::{expect_arity, FunctionArgument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateArithmeticOp {
    DateTimeAddDayTimeDuration,
    DateTimeSubtractDayTimeDuration,
    DateTimeAddYearMonthDuration,
    DateTimeSubtractYearMonthDuration,
    DateAddYearMonthDuration,
    DateSubtractYearMonthDuration,
}

impl DateArithmeticOp {
    pub const ALL: [DateArithmeticOp; 6] = [
        DateArithmeticOp::DateTimeAddDayTimeDuration,
        DateArithmeticOp::DateTimeSubtractDayTimeDuration,
        DateArithmeticOp::DateTimeAddYearMonthDuration,
        DateArithmeticOp::DateTimeSubtractYearMonthDuration,
        DateArithmeticOp::DateAddYearMonthDuration,
        DateArithmeticOp::DateSubtractYearMonthDuration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DateArithmeticOp::DateTimeAddDayTimeDuration => "dateTime-add-dayTimeDuration",
            DateArithmeticOp::DateTimeSubtractDayTimeDuration => "dateTime-subtract-dayTimeDuration",
            DateArithmeticOp::DateTimeAddYearMonthDuration => "dateTime-add-yearMonthDuration",
            DateArithmeticOp::DateTimeSubtractYearMonthDuration => "dateTime-subtract-yearMonthDuration",
            DateArithmeticOp::DateAddYearMonthDuration => "date-add-yearMonthDuration",
            DateArithmeticOp::DateSubtractYearMonthDuration => "date-subtract-yearMonthDuration",
        }
    }

    /// Datatype of the first argument and of the result.
    pub fn operand_type(self) -> DataType {
        match self {
            DateArithmeticOp::DateAddYearMonthDuration
            | DateArithmeticOp::DateSubtractYearMonthDuration => DataType::Date,
            _ => DataType::DateTime,
        }
    }

    pub fn duration_type(self) -> DataType {
        match self {
            DateArithmeticOp::DateTimeAddDayTimeDuration
            | DateArithmeticOp::DateTimeSubtractDayTimeDuration => DataType::DayTimeDuration,
            _ => DataType::YearMonthDuration,
        }
    }

    fn subtracts(self) -> bool {
        matches!(
            self,
            DateArithmeticOp::DateTimeSubtractDayTimeDuration
                | DateArithmeticOp::DateTimeSubtractYearMonthDuration
                | DateArithmeticOp::DateSubtractYearMonthDuration
        )
    }
}

pub(crate) fn evaluate(op: DateArithmeticOp, args: &[FunctionArgument]) -> Result<ExpressionResult, Status> {
    expect_arity(args, 2)?;
    let operand = args[0].simple(op.operand_type())?;
    let duration = args[1].simple(op.duration_type())?;

    let result = match (operand, duration) {
        (AttributeValue::DateTime(dt), AttributeValue::DayTimeDuration(d)) => {
            let d = if op.subtracts() { d.negated() } else { *d };
            dt.checked_add_day_time(&d).map(AttributeValue::DateTime)
        }
        (AttributeValue::DateTime(dt), AttributeValue::YearMonthDuration(d)) => {
            let d = if op.subtracts() { d.negated() } else { *d };
            dt.checked_add_year_month(&d).map(AttributeValue::DateTime)
        }
        (AttributeValue::Date(date), AttributeValue::YearMonthDuration(d)) => {
            let d = if op.subtracts() { d.negated() } else { *d };
            date.checked_add_year_month(&d).map(AttributeValue::Date)
        }
        (a, b) => {
            return Err(Status::processing_error(format!(
                "Cannot combine '{}' with '{}'",
                a.data_type(),
                b.data_type()
            )))
        }
    };

    result
        .map(ExpressionResult::Single)
        .ok_or_else(|| Status::processing_error(format!("Result of {} with {} is out of range", operand, duration)))
}
