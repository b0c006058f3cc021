//! Set operations over two bags.
//!
//! Duplicates are ignored: an element present twice counts once. The bag
//! results keep first-seen order, first bag then second. Subset and
//! set-equals are containment checks, never sorted comparisons.

use verdict_contracts::{
    datatype::DataType,
    expression::{Bag, ExpressionResult},
    status::Status,
    value::AttributeValue,
};

use crate::argument::{bag_contains, boolean_result, expect_arity, FunctionArgument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    Intersection,
    AtLeastOneMemberOf,
    Union,
    Subset,
    SetEquals,
}

impl SetOp {
    pub const ALL: [SetOp; 5] = [
        SetOp::Intersection,
        SetOp::AtLeastOneMemberOf,
        SetOp::Union,
        SetOp::Subset,
        SetOp::SetEquals,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            SetOp::Intersection => "intersection",
            SetOp::AtLeastOneMemberOf => "at-least-one-member-of",
            SetOp::Union => "union",
            SetOp::Subset => "subset",
            SetOp::SetEquals => "set-equals",
        }
    }

    pub fn returns_bag(self) -> bool {
        matches!(self, SetOp::Intersection | SetOp::Union)
    }
}

fn push_distinct(out: &mut Bag, bag: &Bag, keep: impl Fn(&AttributeValue) -> bool) {
    for value in bag {
        if keep(value) && !bag_contains(out, value) {
            out.push(value.clone());
        }
    }
}

fn contained_in(a: &Bag, b: &Bag) -> bool {
    a.iter().all(|v| bag_contains(b, v))
}

pub(crate) fn evaluate(
    data_type: DataType,
    op: SetOp,
    args: &[FunctionArgument],
) -> Result<ExpressionResult, Status> {
    expect_arity(args, 2)?;
    let first = args[0].typed_bag(data_type)?;
    let second = args[1].typed_bag(data_type)?;

    let result = match op {
        SetOp::Intersection => {
            let mut out = Bag::new();
            push_distinct(&mut out, first, |v| bag_contains(second, v));
            ExpressionResult::Bag(out)
        }
        SetOp::Union => {
            let mut out = Bag::new();
            push_distinct(&mut out, first, |_| true);
            push_distinct(&mut out, second, |_| true);
            ExpressionResult::Bag(out)
        }
        SetOp::AtLeastOneMemberOf => boolean_result(first.iter().any(|v| bag_contains(second, v))),
        SetOp::Subset => boolean_result(contained_in(first, second)),
        SetOp::SetEquals => {
            boolean_result(contained_in(first, second) && contained_in(second, first))
        }
    };
    Ok(result)
}
