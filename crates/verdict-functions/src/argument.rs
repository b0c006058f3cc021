//! Function arguments and the validation every function applies to them.
//!
//! Validation runs per argument, in position order: missing argument first,
//! then bag versus simple value, then datatype. Messages are returned
//! without the function prefix; [`FunctionDefinition`] adds it.
//!
//! [`FunctionDefinition`]: crate::definition::FunctionDefinition

use verdict_contracts::{
    datatype::DataType,
    expression::{Bag, ExpressionResult},
    status::Status,
    value::AttributeValue,
};

pub(crate) const NULL_ARGUMENT: &str = "Got null argument";
pub(crate) const EXPECTED_BAG: &str = "Expected a bag, saw a simple value";
pub(crate) const EXPECTED_SIMPLE: &str = "Expected a simple value, saw a bag";

/// One positional argument of a function application.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArgument {
    Value(AttributeValue),
    Bag(Bag),
    /// The argument slot is empty.
    Missing,
    /// The argument expression itself failed.
    Error(Status),
}

impl FunctionArgument {
    /// The simple value of datatype `data_type`.
    pub fn simple(&self, data_type: DataType) -> Result<&AttributeValue, Status> {
        match self {
            FunctionArgument::Value(value) => {
                expect_type(data_type, value.data_type())?;
                Ok(value)
            }
            FunctionArgument::Bag(_) => Err(Status::processing_error(EXPECTED_SIMPLE)),
            FunctionArgument::Missing => Err(Status::processing_error(NULL_ARGUMENT)),
            FunctionArgument::Error(status) => Err(status.clone()),
        }
    }

    /// A bag, whatever its element types.
    pub fn bag(&self) -> Result<&Bag, Status> {
        match self {
            FunctionArgument::Bag(bag) => Ok(bag),
            FunctionArgument::Value(_) => Err(Status::processing_error(EXPECTED_BAG)),
            FunctionArgument::Missing => Err(Status::processing_error(NULL_ARGUMENT)),
            FunctionArgument::Error(status) => Err(status.clone()),
        }
    }

    /// A bag whose elements are all of datatype `data_type`.
    pub fn typed_bag(&self, data_type: DataType) -> Result<&Bag, Status> {
        let bag = self.bag()?;
        for value in bag {
            expect_type(data_type, value.data_type())?;
        }
        Ok(bag)
    }

    pub fn boolean(&self) -> Result<bool, Status> {
        match self.simple(DataType::Boolean)? {
            AttributeValue::Boolean(b) => Ok(*b),
            other => Err(type_mismatch(DataType::Boolean, other.data_type())),
        }
    }

    pub fn integer(&self) -> Result<i64, Status> {
        match self.simple(DataType::Integer)? {
            AttributeValue::Integer(i) => Ok(*i),
            other => Err(type_mismatch(DataType::Integer, other.data_type())),
        }
    }

    pub fn string(&self) -> Result<&str, Status> {
        match self.simple(DataType::String)? {
            AttributeValue::String(s) => Ok(s),
            other => Err(type_mismatch(DataType::String, other.data_type())),
        }
    }
}

impl From<AttributeValue> for FunctionArgument {
    fn from(value: AttributeValue) -> Self {
        FunctionArgument::Value(value)
    }
}

impl From<Bag> for FunctionArgument {
    fn from(bag: Bag) -> Self {
        FunctionArgument::Bag(bag)
    }
}

impl From<Option<AttributeValue>> for FunctionArgument {
    fn from(value: Option<AttributeValue>) -> Self {
        value.map_or(FunctionArgument::Missing, FunctionArgument::Value)
    }
}

impl From<ExpressionResult> for FunctionArgument {
    fn from(result: ExpressionResult) -> Self {
        match result {
            ExpressionResult::Single(value) => FunctionArgument::Value(value),
            ExpressionResult::Bag(bag) => FunctionArgument::Bag(bag),
            ExpressionResult::Error(status) => FunctionArgument::Error(status),
        }
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

pub(crate) fn type_mismatch(expected: DataType, saw: DataType) -> Status {
    Status::processing_error(format!(
        "Expected data type '{}' saw '{}'",
        expected.short_name(),
        saw.short_name()
    ))
}

fn expect_type(expected: DataType, saw: DataType) -> Result<(), Status> {
    if expected == saw {
        Ok(())
    } else {
        Err(type_mismatch(expected, saw))
    }
}

/// Exactly `expected` arguments.
pub(crate) fn expect_arity(args: &[FunctionArgument], expected: usize) -> Result<(), Status> {
    if args.len() == expected {
        return Ok(());
    }
    let noun = if expected == 1 { "argument" } else { "arguments" };
    Err(Status::processing_error(format!(
        "Expected {} {}, got {}",
        expected,
        noun,
        args.len()
    )))
}

/// At least `minimum` arguments.
pub(crate) fn expect_min_arity(args: &[FunctionArgument], minimum: usize) -> Result<(), Status> {
    if args.len() >= minimum {
        Ok(())
    } else {
        Err(Status::processing_error(format!(
            "Expected {} or more arguments, got {}",
            minimum,
            args.len()
        )))
    }
}

pub(crate) fn boolean_result(value: bool) -> ExpressionResult {
    ExpressionResult::Single(AttributeValue::Boolean(value))
}

/// Value equality as the equality functions define it: date-times with
/// offsets compare as instants, everything else structurally.
pub(crate) fn values_equal(a: &AttributeValue, b: &AttributeValue) -> bool {
    match (a, b) {
        (AttributeValue::DateTime(x), AttributeValue::DateTime(y)) => x.same_instant(y),
        _ => a == b,
    }
}

pub(crate) fn bag_contains(bag: &Bag, value: &AttributeValue) -> bool {
    bag.iter().any(|v| values_equal(v, value))
}
