//! Combining algorithms over scripted children.

use std::sync::atomic::{AtomicUsize, Ordering};

use verdict_combining::{algorithm::MORE_THAN_ONE_APPLICABLE, CombiningAlgorithm};
use verdict_contracts::{
    decision::Decision,
    error::{VerdictError, VerdictResult},
    obligation::Obligation,
    request::IndividualDecisionRequest,
    result::EvaluationResult,
    status::{Status, StatusCode},
};
use verdict_core::traits::{
    Evaluatable, EvaluationContext, MatchResult, PolicyFinderResult,
};

// ── Collaborators ─────────────────────────────────────────────────────────────

struct EmptyContext {
    request: IndividualDecisionRequest,
}

impl EmptyContext {
    fn new() -> Self {
        Self { request: IndividualDecisionRequest::new(Vec::new()) }
    }
}

impl EvaluationContext for EmptyContext {
    fn request(&self) -> &IndividualDecisionRequest {
        &self.request
    }

    fn root_policy(&self) -> PolicyFinderResult {
        PolicyFinderResult::not_found()
    }
}

/// A child that always answers with a fixed result and counts evaluations.
struct Scripted {
    result: Option<EvaluationResult>,
    target: MatchResult,
    evaluations: AtomicUsize,
}

impl Scripted {
    fn decides(decision: Decision) -> Self {
        Self::returning(EvaluationResult::new(decision))
    }

    fn returning(result: EvaluationResult) -> Self {
        Self { result: Some(result), target: MatchResult::Match, evaluations: AtomicUsize::new(0) }
    }

    fn faulting() -> Self {
        Self { result: None, target: MatchResult::Match, evaluations: AtomicUsize::new(0) }
    }

    fn targeting(mut self, target: MatchResult) -> Self {
        self.target = target;
        self
    }

    fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

impl Evaluatable for Scripted {
    fn evaluate(&self, _context: &dyn EvaluationContext) -> VerdictResult<EvaluationResult> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        self.result.clone().ok_or_else(|| VerdictError::EvaluationFailure {
            reason: "scripted fault".to_string(),
        })
    }

    fn target_match(&self, _context: &dyn EvaluationContext) -> MatchResult {
        self.target.clone()
    }
}

fn combine(algorithm: CombiningAlgorithm, children: &[Scripted]) -> EvaluationResult {
    algorithm.combine(&EmptyContext::new(), children, &[])
}

fn decisions(algorithm: CombiningAlgorithm, ds: &[Decision]) -> Decision {
    let children: Vec<Scripted> = ds.iter().copied().map(Scripted::decides).collect();
    combine(algorithm, &children).decision
}

// ── Deny-overrides ────────────────────────────────────────────────────────────

#[test]
fn deny_overrides_prefers_deny() {
    use Decision::*;
    assert_eq!(decisions(CombiningAlgorithm::DenyOverrides, &[NotApplicable, Permit, Deny]), Deny);
}

#[test]
fn deny_overrides_permit_when_nothing_denies() {
    use Decision::*;
    assert_eq!(decisions(CombiningAlgorithm::DenyOverrides, &[Permit, NotApplicable]), Permit);
}

#[test]
fn deny_overrides_with_no_children_is_not_applicable() {
    assert_eq!(decisions(CombiningAlgorithm::DenyOverrides, &[]), Decision::NotApplicable);
}

#[test]
fn deny_overrides_indeterminate_deny_with_permit_is_indeterminate_dp() {
    use Decision::*;
    assert_eq!(
        decisions(CombiningAlgorithm::DenyOverrides, &[IndeterminateDeny, Permit]),
        IndeterminateDenyPermit
    );
}

#[test]
fn deny_overrides_lone_indeterminate_permit() {
    use Decision::*;
    assert_eq!(
        decisions(CombiningAlgorithm::DenyOverrides, &[IndeterminatePermit]),
        IndeterminatePermit
    );
    assert_eq!(
        decisions(CombiningAlgorithm::DenyOverrides, &[IndeterminatePermit, NotApplicable]),
        IndeterminatePermit
    );
}

#[test]
fn deny_overrides_stops_at_first_deny() {
    let children = [
        Scripted::decides(Decision::Permit),
        Scripted::decides(Decision::Deny),
        Scripted::decides(Decision::Permit),
    ];
    assert_eq!(combine(CombiningAlgorithm::DenyOverrides, &children).decision, Decision::Deny);
    assert_eq!(children[1].evaluations(), 1);
    assert_eq!(children[2].evaluations(), 0);
}

#[test]
fn deny_overrides_merges_permit_obligations() {
    let mut first = EvaluationResult::new(Decision::Permit);
    first.add_obligations([Obligation::new("urn:example:obligation:log")]);
    let mut second = EvaluationResult::new(Decision::Permit);
    second.add_obligations([Obligation::new("urn:example:obligation:notify")]);

    let result = combine(
        CombiningAlgorithm::DenyOverrides,
        &[Scripted::returning(first), Scripted::returning(second)],
    );
    assert_eq!(result.decision, Decision::Permit);
    assert_eq!(result.obligations.len(), 2);
}

#[test]
fn faulting_child_becomes_indeterminate() {
    let children = [Scripted::decides(Decision::Permit), Scripted::faulting()];
    let result = combine(CombiningAlgorithm::DenyOverrides, &children);
    assert_eq!(result.decision, Decision::Indeterminate);
    assert_eq!(result.status.code, StatusCode::ProcessingError);
    assert!(result.status.message().contains("scripted fault"));
}

// ── Permit-overrides ──────────────────────────────────────────────────────────

#[test]
fn permit_overrides_prefers_permit() {
    use Decision::*;
    assert_eq!(decisions(CombiningAlgorithm::PermitOverrides, &[Deny, Permit]), Permit);
    assert_eq!(decisions(CombiningAlgorithm::OrderedPermitOverrides, &[Deny, NotApplicable]), Deny);
    assert_eq!(
        decisions(CombiningAlgorithm::PermitOverrides, &[IndeterminatePermit, Deny]),
        IndeterminateDenyPermit
    );
}

#[test]
fn ordered_deny_overrides_matches_unordered() {
    use Decision::*;
    let cases: &[&[Decision]] = &[
        &[NotApplicable, Permit, Deny],
        &[IndeterminateDeny, Permit],
        &[IndeterminatePermit],
        &[],
    ];
    for case in cases {
        assert_eq!(
            decisions(CombiningAlgorithm::OrderedDenyOverrides, case),
            decisions(CombiningAlgorithm::DenyOverrides, case)
        );
    }
}

// ── First-applicable ──────────────────────────────────────────────────────────

#[test]
fn first_applicable_returns_first_non_not_applicable() {
    let children = [
        Scripted::decides(Decision::NotApplicable),
        Scripted::decides(Decision::Deny),
        Scripted::decides(Decision::Permit),
    ];
    assert_eq!(combine(CombiningAlgorithm::FirstApplicable, &children).decision, Decision::Deny);
    assert_eq!(children[2].evaluations(), 0);
    assert_eq!(
        decisions(CombiningAlgorithm::FirstApplicable, &[Decision::NotApplicable]),
        Decision::NotApplicable
    );
}

#[test]
fn first_applicable_stops_at_indeterminate() {
    use Decision::*;
    assert_eq!(
        decisions(CombiningAlgorithm::FirstApplicable, &[IndeterminatePermit, Deny]),
        IndeterminatePermit
    );
}

// ── Only-one-applicable ───────────────────────────────────────────────────────

#[test]
fn only_one_applicable_evaluates_the_single_match() {
    let children = [
        Scripted::decides(Decision::Deny).targeting(MatchResult::NoMatch),
        Scripted::decides(Decision::Permit),
    ];
    assert_eq!(combine(CombiningAlgorithm::OnlyOneApplicable, &children).decision, Decision::Permit);
    assert_eq!(children[0].evaluations(), 0);
}

#[test]
fn only_one_applicable_rejects_two_matches() {
    let children = [Scripted::decides(Decision::Permit), Scripted::decides(Decision::Deny)];
    let result = combine(CombiningAlgorithm::OnlyOneApplicable, &children);
    assert_eq!(result.decision, Decision::Indeterminate);
    assert_eq!(result.status, Status::processing_error(MORE_THAN_ONE_APPLICABLE));
    assert_eq!(children[0].evaluations(), 0);
}

#[test]
fn only_one_applicable_propagates_indeterminate_target() {
    let children = [Scripted::decides(Decision::Permit)
        .targeting(MatchResult::Indeterminate(Status::missing_attribute("no subject")))];
    let result = combine(CombiningAlgorithm::OnlyOneApplicable, &children);
    assert_eq!(result.decision, Decision::Indeterminate);
    assert_eq!(result.status.code, StatusCode::MissingAttribute);
}

#[test]
fn only_one_applicable_without_matches_is_not_applicable() {
    let children = [Scripted::decides(Decision::Permit).targeting(MatchResult::NoMatch)];
    assert_eq!(
        combine(CombiningAlgorithm::OnlyOneApplicable, &children).decision,
        Decision::NotApplicable
    );
}

// ── Unless ────────────────────────────────────────────────────────────────────

#[test]
fn deny_unless_permit_never_indeterminate() {
    use Decision::*;
    assert_eq!(decisions(CombiningAlgorithm::DenyUnlessPermit, &[]), Deny);
    assert_eq!(decisions(CombiningAlgorithm::DenyUnlessPermit, &[Indeterminate, NotApplicable]), Deny);
    assert_eq!(decisions(CombiningAlgorithm::DenyUnlessPermit, &[Deny, Permit]), Permit);
}

#[test]
fn permit_unless_deny_stops_at_deny() {
    let children = [
        Scripted::decides(Decision::Permit),
        Scripted::decides(Decision::Deny),
        Scripted::faulting(),
    ];
    assert_eq!(combine(CombiningAlgorithm::PermitUnlessDeny, &children).decision, Decision::Deny);
    assert_eq!(children[2].evaluations(), 0);
    assert_eq!(
        decisions(CombiningAlgorithm::PermitUnlessDeny, &[Decision::IndeterminateDeny]),
        Decision::Permit
    );
}
