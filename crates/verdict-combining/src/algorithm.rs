//! The combining algorithms and their dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use verdict_contracts::{
    decision::Decision, result::EvaluationResult, status::Status, value::AttributeValue,
};
use verdict_core::traits::{Evaluatable, EvaluationContext, MatchResult};

use crate::fold::{OverridesState, Step, UnlessState};

const RULE_COMBINING_1: &str = "urn:oasis:names:tc:xacml:1.0:rule-combining-algorithm:";
const RULE_COMBINING_3: &str = "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:";
const POLICY_COMBINING_1: &str = "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:";
const POLICY_COMBINING_3: &str = "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:";

pub const MORE_THAN_ONE_APPLICABLE: &str = "More than one applicable policy";

/// A named parameter handed to a combining algorithm by its policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinerParameter {
    pub name: String,
    pub value: AttributeValue,
}

/// How the results of a policy's children are resolved into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombiningAlgorithm {
    DenyOverrides,
    PermitOverrides,
    OrderedDenyOverrides,
    OrderedPermitOverrides,
    FirstApplicable,
    /// Policy combining only. Selects children by target applicability.
    OnlyOneApplicable,
    DenyUnlessPermit,
    PermitUnlessDeny,
}

impl CombiningAlgorithm {
    pub const ALL: [CombiningAlgorithm; 8] = [
        CombiningAlgorithm::DenyOverrides,
        CombiningAlgorithm::PermitOverrides,
        CombiningAlgorithm::OrderedDenyOverrides,
        CombiningAlgorithm::OrderedPermitOverrides,
        CombiningAlgorithm::FirstApplicable,
        CombiningAlgorithm::OnlyOneApplicable,
        CombiningAlgorithm::DenyUnlessPermit,
        CombiningAlgorithm::PermitUnlessDeny,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CombiningAlgorithm::DenyOverrides => "deny-overrides",
            CombiningAlgorithm::PermitOverrides => "permit-overrides",
            CombiningAlgorithm::OrderedDenyOverrides => "ordered-deny-overrides",
            CombiningAlgorithm::OrderedPermitOverrides => "ordered-permit-overrides",
            CombiningAlgorithm::FirstApplicable => "first-applicable",
            CombiningAlgorithm::OnlyOneApplicable => "only-one-applicable",
            CombiningAlgorithm::DenyUnlessPermit => "deny-unless-permit",
            CombiningAlgorithm::PermitUnlessDeny => "permit-unless-deny",
        }
    }

    fn is_xacml1(self) -> bool {
        matches!(self, CombiningAlgorithm::FirstApplicable | CombiningAlgorithm::OnlyOneApplicable)
    }

    /// The rule-combining URN, or `None` for policy-only algorithms.
    pub fn rule_id(self) -> Option<String> {
        match self {
            CombiningAlgorithm::OnlyOneApplicable => None,
            a if a.is_xacml1() => Some(format!("{}{}", RULE_COMBINING_1, a.name())),
            a => Some(format!("{}{}", RULE_COMBINING_3, a.name())),
        }
    }

    /// The policy-combining URN.
    pub fn policy_id(self) -> String {
        let prefix = if self.is_xacml1() { POLICY_COMBINING_1 } else { POLICY_COMBINING_3 };
        format!("{}{}", prefix, self.name())
    }

    /// Look an algorithm up by rule- or policy-combining URN, or by bare name.
    pub fn from_id(id: &str) -> Option<CombiningAlgorithm> {
        let name = id.rsplit(':').next().unwrap_or(id);
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Combine `children` in order.
    ///
    /// Children are evaluated lazily, so those after a short-circuiting
    /// result are never evaluated. A child whose evaluation faults is folded
    /// in as `Indeterminate` with a processing-error status.
    pub fn combine<'c, T, I>(
        self,
        context: &dyn EvaluationContext,
        children: I,
        parameters: &[CombinerParameter],
    ) -> EvaluationResult
    where
        T: Evaluatable + ?Sized + 'c,
        I: IntoIterator<Item = &'c T>,
    {
        trace!(algorithm = self.name(), parameters = parameters.len(), "combining");
        let children = children.into_iter();
        match self {
            CombiningAlgorithm::DenyOverrides | CombiningAlgorithm::OrderedDenyOverrides => {
                overrides(Decision::Deny, context, children)
            }
            CombiningAlgorithm::PermitOverrides | CombiningAlgorithm::OrderedPermitOverrides => {
                overrides(Decision::Permit, context, children)
            }
            CombiningAlgorithm::DenyUnlessPermit => unless(Decision::Deny, context, children),
            CombiningAlgorithm::PermitUnlessDeny => unless(Decision::Permit, context, children),
            CombiningAlgorithm::FirstApplicable => first_applicable(context, children),
            CombiningAlgorithm::OnlyOneApplicable => only_one_applicable(context, children),
        }
    }
}

impl fmt::Display for CombiningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Algorithms ────────────────────────────────────────────────────────────────

fn evaluate_child<T: Evaluatable + ?Sized>(child: &T, context: &dyn EvaluationContext) -> EvaluationResult {
    child.evaluate(context).unwrap_or_else(|e| {
        warn!(error = %e, "child evaluation failed");
        EvaluationResult::processing_error(Decision::Indeterminate, e.to_string())
    })
}

fn overrides<'c, T: Evaluatable + ?Sized + 'c>(
    overriding: Decision,
    context: &dyn EvaluationContext,
    children: impl Iterator<Item = &'c T>,
) -> EvaluationResult {
    let mut state = OverridesState::default();
    for child in children {
        match state.accumulate(overriding, evaluate_child(child, context)) {
            Step::Continue(next) => state = next,
            Step::Done(result) => return result,
        }
    }
    state.resolve()
}

fn unless<'c, T: Evaluatable + ?Sized + 'c>(
    fallback: Decision,
    context: &dyn EvaluationContext,
    children: impl Iterator<Item = &'c T>,
) -> EvaluationResult {
    let mut state = UnlessState::new(fallback);
    for child in children {
        match state.accumulate(evaluate_child(child, context)) {
            Step::Continue(next) => state = next,
            Step::Done(result) => return result,
        }
    }
    state.resolve()
}

fn first_applicable<'c, T: Evaluatable + ?Sized + 'c>(
    context: &dyn EvaluationContext,
    children: impl Iterator<Item = &'c T>,
) -> EvaluationResult {
    children
        .map(|child| evaluate_child(child, context))
        .find(|result| result.decision != Decision::NotApplicable)
        .unwrap_or_else(EvaluationResult::not_applicable)
}

fn only_one_applicable<'c, T: Evaluatable + ?Sized + 'c>(
    context: &dyn EvaluationContext,
    children: impl Iterator<Item = &'c T>,
) -> EvaluationResult {
    let mut selected: Option<&T> = None;
    for child in children {
        match child.target_match(context) {
            MatchResult::NoMatch => {}
            MatchResult::Indeterminate(status) => {
                return EvaluationResult::with_status(Decision::Indeterminate, status);
            }
            MatchResult::Match if selected.is_some() => {
                return EvaluationResult::with_status(
                    Decision::Indeterminate,
                    Status::processing_error(MORE_THAN_ONE_APPLICABLE),
                );
            }
            MatchResult::Match => selected = Some(child),
        }
    }
    match selected {
        Some(child) => evaluate_child(child, context),
        None => EvaluationResult::not_applicable(),
    }
}
