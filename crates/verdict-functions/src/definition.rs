//! Function definitions: identifier, signature and dispatch.

use tracing::trace;
use verdict_contracts::{datatype::DataType, expression::ExpressionResult};

use crate::{
    argument::FunctionArgument,
    bag::{self, BagOp},
    comparison::{self, Comparison},
    date_arithmetic::{self, DateArithmeticOp},
    logical::{self, LogicalOp},
    set::{self, SetOp},
    string_normalize::{self, NormalizeOp},
};

const XACML1_FUNCTION: &str = "urn:oasis:names:tc:xacml:1.0:function:";
const XACML3_FUNCTION: &str = "urn:oasis:names:tc:xacml:3.0:function:";

/// Which computation a function performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Logical(LogicalOp),
    Equal(DataType),
    Compare(DataType, Comparison),
    Bag(DataType, BagOp),
    Set(DataType, SetOp),
    DateArithmetic(DateArithmeticOp),
    StringNormalize(NormalizeOp),
}

impl FunctionKind {
    /// The local name, e.g. `"string-is-in"`.
    pub fn name(&self) -> String {
        match self {
            FunctionKind::Logical(op) => op.name().to_string(),
            FunctionKind::Equal(dt) => format!("{}-equal", dt.short_name()),
            FunctionKind::Compare(dt, c) => format!("{}-{}", dt.short_name(), c.suffix()),
            FunctionKind::Bag(dt, op) => format!("{}-{}", dt.short_name(), op.suffix()),
            FunctionKind::Set(dt, op) => format!("{}-{}", dt.short_name(), op.suffix()),
            FunctionKind::DateArithmetic(op) => op.name().to_string(),
            FunctionKind::StringNormalize(op) => op.name().to_string(),
        }
    }

    /// The full URN. Duration-typed and date-arithmetic functions use the
    /// 3.0 namespace, the rest 1.0.
    pub fn id(&self) -> String {
        let is_duration = |dt: &DataType| {
            matches!(dt, DataType::DayTimeDuration | DataType::YearMonthDuration)
        };
        let v3 = match self {
            FunctionKind::DateArithmetic(_) => true,
            FunctionKind::Equal(dt) | FunctionKind::Bag(dt, _) | FunctionKind::Set(dt, _) => {
                is_duration(dt)
            }
            _ => false,
        };
        let prefix = if v3 { XACML3_FUNCTION } else { XACML1_FUNCTION };
        format!("{}{}", prefix, self.name())
    }
}

/// A function with its identifier and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    id: String,
    kind: FunctionKind,
}

impl FunctionDefinition {
    pub fn new(kind: FunctionKind) -> Self {
        Self { id: kind.id(), kind }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The identifier from `function:` on, used to prefix status messages.
    pub fn short_id(&self) -> &str {
        match self.id.find("function:") {
            Some(idx) => &self.id[idx..],
            None => &self.id,
        }
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn result_type(&self) -> DataType {
        match self.kind {
            FunctionKind::Logical(_)
            | FunctionKind::Equal(_)
            | FunctionKind::Compare(..) => DataType::Boolean,
            FunctionKind::Bag(_, BagOp::Size) => DataType::Integer,
            FunctionKind::Bag(_, BagOp::IsIn) => DataType::Boolean,
            FunctionKind::Bag(dt, _) => dt,
            FunctionKind::Set(dt, op) if op.returns_bag() => dt,
            FunctionKind::Set(..) => DataType::Boolean,
            FunctionKind::DateArithmetic(op) => op.operand_type(),
            FunctionKind::StringNormalize(_) => DataType::String,
        }
    }

    /// Datatype of the (first) argument.
    pub fn argument_type(&self) -> DataType {
        match self.kind {
            FunctionKind::Logical(LogicalOp::NOf) => DataType::Integer,
            FunctionKind::Logical(_) => DataType::Boolean,
            FunctionKind::Equal(dt)
            | FunctionKind::Compare(dt, _)
            | FunctionKind::Bag(dt, _)
            | FunctionKind::Set(dt, _) => dt,
            FunctionKind::DateArithmetic(op) => op.operand_type(),
            FunctionKind::StringNormalize(_) => DataType::String,
        }
    }

    pub fn returns_bag(&self) -> bool {
        match self.kind {
            FunctionKind::Bag(_, BagOp::Bag) => true,
            FunctionKind::Set(_, op) => op.returns_bag(),
            _ => false,
        }
    }

    /// Apply this function.
    ///
    /// Never panics: arity, missing-argument and type problems, as well as
    /// computation failures, come back as an error result whose message is
    /// prefixed with [`short_id`](Self::short_id).
    pub fn evaluate(&self, args: &[FunctionArgument]) -> ExpressionResult {
        let outcome = match self.kind {
            FunctionKind::Logical(op) => logical::evaluate(op, args),
            FunctionKind::Equal(dt) => comparison::equal(dt, args),
            FunctionKind::Compare(dt, c) => comparison::compare(dt, c, args),
            FunctionKind::Bag(dt, op) => bag::evaluate(dt, op, args),
            FunctionKind::Set(dt, op) => set::evaluate(dt, op, args),
            FunctionKind::DateArithmetic(op) => date_arithmetic::evaluate(op, args),
            FunctionKind::StringNormalize(op) => string_normalize::evaluate(op, args),
        };
        match outcome {
            Ok(result) => result,
            Err(status) => {
                trace!(function = %self.id, status = %status, "function evaluation failed");
                ExpressionResult::Error(status.prefixed(self.short_id()))
            }
        }
    }
}
