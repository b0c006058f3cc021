//! Policies and policy sets.
//!
//! Both combine their children with a [`CombiningAlgorithm`], attach their
//! own obligations and advice to a definite decision, and record their
//! identifier on every applicable result. An Indeterminate target does not
//! stop evaluation; it weakens a definite combined decision to the matching
//! Indeterminate variant.

use serde::{Deserialize, Serialize};
use tracing::debug;

use verdict_combining::{CombinerParameter, CombiningAlgorithm};
use verdict_contracts::{
    decision::Decision,
    error::VerdictResult,
    obligation::IdReference,
    result::EvaluationResult,
    status::Status,
};
use verdict_core::traits::{Evaluatable, EvaluationContext, MatchResult, PolicyDef};

use crate::{
    obligation::{attach_fulfilled, AdviceExpression, ObligationExpression},
    reference::PolicyIdReference,
    rule::Rule,
    target::Target,
};

/// Fold the target outcome into the combined result of the children.
fn conclude(
    target: MatchResult,
    combined: EvaluationResult,
    obligations: &[ObligationExpression],
    advice: &[AdviceExpression],
    context: &dyn EvaluationContext,
) -> EvaluationResult {
    match target {
        MatchResult::Indeterminate(status) => weaken(combined, status),
        _ => attach_fulfilled(combined, obligations, advice, context),
    }
}

fn weaken(combined: EvaluationResult, status: Status) -> EvaluationResult {
    match combined.decision {
        Decision::Permit | Decision::Deny => {
            EvaluationResult::with_status(combined.decision.as_indeterminate(), status)
        }
        _ => combined,
    }
}

fn identifier(id: &str, version: &Option<String>) -> IdReference {
    match version {
        Some(v) => IdReference::versioned(id, v.as_str()),
        None => IdReference::new(id),
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

/// An ordered list of rules under one rule-combining algorithm.
///
/// ```toml
/// [[policies]]
/// id = "urn:example:policy:records"
/// algorithm = "deny-overrides"
///
/// [[policies.rules]]
/// id = "read"
/// effect = "permit"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target: Target,
    pub algorithm: CombiningAlgorithm,
    #[serde(default)]
    pub parameters: Vec<CombinerParameter>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub obligations: Vec<ObligationExpression>,
    #[serde(default)]
    pub advice: Vec<AdviceExpression>,
}

impl Policy {
    pub fn new(id: impl Into<String>, algorithm: CombiningAlgorithm) -> Self {
        Self {
            id: id.into(),
            version: None,
            description: String::new(),
            target: Target::any(),
            algorithm,
            parameters: Vec::new(),
            rules: Vec::new(),
            obligations: Vec::new(),
            advice: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_obligation(mut self, obligation: ObligationExpression) -> Self {
        self.obligations.push(obligation);
        self
    }

    pub fn with_advice(mut self, advice: AdviceExpression) -> Self {
        self.advice.push(advice);
        self
    }
}

impl Evaluatable for Policy {
    fn evaluate(&self, context: &dyn EvaluationContext) -> VerdictResult<EvaluationResult> {
        let target = self.target.evaluate(context);
        if target == MatchResult::NoMatch {
            return Ok(EvaluationResult::not_applicable());
        }
        let combined = self.algorithm.combine(context, &self.rules, &self.parameters);
        let mut result = conclude(target, combined, &self.obligations, &self.advice, context);
        if result.decision != Decision::NotApplicable {
            result.add_policy_identifier(self.identifier());
        }
        debug!(policy_id = %self.id, decision = %result.decision, "policy evaluated");
        Ok(result)
    }

    fn target_match(&self, context: &dyn EvaluationContext) -> MatchResult {
        self.target.evaluate(context)
    }
}

impl PolicyDef for Policy {
    fn identifier(&self) -> IdReference {
        identifier(&self.id, &self.version)
    }
}

// ── PolicySet ─────────────────────────────────────────────────────────────────

/// One child of a policy set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicySetChild {
    Policy(Policy),
    PolicySet(PolicySet),
    Reference(PolicyIdReference),
}

impl Evaluatable for PolicySetChild {
    fn evaluate(&self, context: &dyn EvaluationContext) -> VerdictResult<EvaluationResult> {
        match self {
            PolicySetChild::Policy(policy) => policy.evaluate(context),
            PolicySetChild::PolicySet(set) => set.evaluate(context),
            PolicySetChild::Reference(reference) => reference.evaluate(context),
        }
    }

    fn target_match(&self, context: &dyn EvaluationContext) -> MatchResult {
        match self {
            PolicySetChild::Policy(policy) => policy.target_match(context),
            PolicySetChild::PolicySet(set) => set.target_match(context),
            PolicySetChild::Reference(reference) => reference.target_match(context),
        }
    }
}

/// Policies, nested sets and references under one policy-combining algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target: Target,
    pub algorithm: CombiningAlgorithm,
    #[serde(default)]
    pub parameters: Vec<CombinerParameter>,
    #[serde(default)]
    pub children: Vec<PolicySetChild>,
    #[serde(default)]
    pub obligations: Vec<ObligationExpression>,
    #[serde(default)]
    pub advice: Vec<AdviceExpression>,
}

impl PolicySet {
    pub fn new(id: impl Into<String>, algorithm: CombiningAlgorithm) -> Self {
        Self {
            id: id.into(),
            version: None,
            description: String::new(),
            target: Target::any(),
            algorithm,
            parameters: Vec::new(),
            children: Vec::new(),
            obligations: Vec::new(),
            advice: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.children.push(PolicySetChild::Policy(policy));
        self
    }

    pub fn with_policy_set(mut self, set: PolicySet) -> Self {
        self.children.push(PolicySetChild::PolicySet(set));
        self
    }

    pub fn with_reference(mut self, reference: PolicyIdReference) -> Self {
        self.children.push(PolicySetChild::Reference(reference));
        self
    }

    pub fn with_obligation(mut self, obligation: ObligationExpression) -> Self {
        self.obligations.push(obligation);
        self
    }

    pub fn with_advice(mut self, advice: AdviceExpression) -> Self {
        self.advice.push(advice);
        self
    }
}

impl Evaluatable for PolicySet {
    fn evaluate(&self, context: &dyn EvaluationContext) -> VerdictResult<EvaluationResult> {
        let target = self.target.evaluate(context);
        if target == MatchResult::NoMatch {
            return Ok(EvaluationResult::not_applicable());
        }
        let combined = self.algorithm.combine(context, &self.children, &self.parameters);
        let mut result = conclude(target, combined, &self.obligations, &self.advice, context);
        if result.decision != Decision::NotApplicable {
            result.add_policy_set_identifier(self.identifier());
        }
        debug!(policy_set_id = %self.id, decision = %result.decision, "policy set evaluated");
        Ok(result)
    }

    fn target_match(&self, context: &dyn EvaluationContext) -> MatchResult {
        self.target.evaluate(context)
    }
}

impl PolicyDef for PolicySet {
    fn identifier(&self) -> IdReference {
        identifier(&self.id, &self.version)
    }

    fn is_policy_set(&self) -> bool {
        true
    }

    fn referenced_ids(&self) -> Vec<String> {
        self.children
            .iter()
            .flat_map(|child| match child {
                PolicySetChild::Policy(_) => Vec::new(),
                PolicySetChild::PolicySet(set) => set.referenced_ids(),
                PolicySetChild::Reference(reference) => vec![reference.id.clone()],
            })
            .collect()
    }
}
