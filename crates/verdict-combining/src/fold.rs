//! Fold states shared by the combining algorithms.
//!
//! Each algorithm is an explicit fold: `accumulate(state, child_result)`
//! returns either the next state or a final result, and `resolve(state)`
//! produces the answer once every child has been seen. States are plain
//! values; nothing is mutated behind another branch's back.

use verdict_contracts::{decision::Decision, result::EvaluationResult};

/// One step of a fold.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<S> {
    Continue(S),
    Done(EvaluationResult),
}

/// Seed `slot` with `result`, or merge `result` into what is already there.
fn merged(slot: Option<EvaluationResult>, result: EvaluationResult) -> Option<EvaluationResult> {
    Some(match slot {
        Some(first) => first.merge(result),
        None => result,
    })
}

fn other_definite(decision: Decision) -> Decision {
    match decision {
        Decision::Deny => Decision::Permit,
        _ => Decision::Deny,
    }
}

// ── Overrides ─────────────────────────────────────────────────────────────────

/// State of a deny-overrides or permit-overrides fold.
///
/// The fold is parameterised by the overriding decision `W` (Deny for
/// deny-overrides); `L` is the other definite decision. Each slot holds the
/// first result of its kind with every later one merged into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverridesState {
    /// Merged `L` results.
    overridden: Option<EvaluationResult>,
    /// Merged `Indeterminate{W}` results.
    indeterminate_overriding: Option<EvaluationResult>,
    /// Merged `Indeterminate{L}` results.
    indeterminate_overridden: Option<EvaluationResult>,
    /// Merged `Indeterminate{DP}` and generic `Indeterminate` results.
    indeterminate_both: Option<EvaluationResult>,
}

impl OverridesState {
    pub fn accumulate(self, overriding: Decision, result: EvaluationResult) -> Step<Self> {
        let overridden = other_definite(overriding);
        let decision = result.decision;

        if decision == overriding {
            return Step::Done(result);
        }
        let next = if decision == overridden {
            Self { overridden: merged(self.overridden, result), ..self }
        } else if decision == overriding.as_indeterminate() {
            Self { indeterminate_overriding: merged(self.indeterminate_overriding, result), ..self }
        } else if decision == overridden.as_indeterminate() {
            Self { indeterminate_overridden: merged(self.indeterminate_overridden, result), ..self }
        } else if matches!(decision, Decision::Indeterminate | Decision::IndeterminateDenyPermit) {
            Self { indeterminate_both: merged(self.indeterminate_both, result), ..self }
        } else {
            // NotApplicable
            self
        };
        Step::Continue(next)
    }

    /// Resolve after every child has been seen:
    ///
    /// 1. any `Indeterminate{DP}` wins;
    /// 2. `Indeterminate{W}` with `L` still reachable is `Indeterminate{DP}`
    ///    carrying the `Indeterminate{W}` status;
    /// 3. `Indeterminate{W}` alone;
    /// 4. the merged `L` results;
    /// 5. `Indeterminate{L}`;
    /// 6. `NotApplicable`.
    pub fn resolve(self) -> EvaluationResult {
        if let Some(both) = self.indeterminate_both {
            return both;
        }
        if let Some(ind_w) = self.indeterminate_overriding {
            if self.indeterminate_overridden.is_some() || self.overridden.is_some() {
                return EvaluationResult::with_status(Decision::IndeterminateDenyPermit, ind_w.status);
            }
            return ind_w;
        }
        if let Some(l) = self.overridden {
            return l;
        }
        if let Some(ind_l) = self.indeterminate_overridden {
            return ind_l;
        }
        EvaluationResult::not_applicable()
    }
}

// ── Unless ────────────────────────────────────────────────────────────────────

/// State of a deny-unless-permit or permit-unless-deny fold.
///
/// The first `W` result ends the fold. Otherwise the answer is the fallback
/// decision, carrying the merged results of every child that decided it.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlessState {
    fallback: Decision,
    fallback_results: Option<EvaluationResult>,
}

impl UnlessState {
    pub fn new(fallback: Decision) -> Self {
        Self { fallback, fallback_results: None }
    }

    pub fn accumulate(self, result: EvaluationResult) -> Step<Self> {
        if result.decision == other_definite(self.fallback) {
            Step::Done(result)
        } else if result.decision == self.fallback {
            Step::Continue(Self { fallback_results: merged(self.fallback_results, result), ..self })
        } else {
            Step::Continue(self)
        }
    }

    pub fn resolve(self) -> EvaluationResult {
        self.fallback_results
            .unwrap_or_else(|| EvaluationResult::new(self.fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_contracts::{obligation::Obligation, status::Status};

    fn run(overriding: Decision, decisions: &[Decision]) -> EvaluationResult {
        let mut state = OverridesState::default();
        for d in decisions {
            match state.accumulate(overriding, EvaluationResult::new(*d)) {
                Step::Continue(next) => state = next,
                Step::Done(result) => return result,
            }
        }
        state.resolve()
    }

    #[test]
    fn permit_overrides_mirrors_deny_overrides() {
        use Decision::*;
        assert_eq!(run(Permit, &[Deny, NotApplicable, Permit]).decision, Permit);
        assert_eq!(run(Permit, &[IndeterminatePermit, Deny]).decision, IndeterminateDenyPermit);
        assert_eq!(run(Permit, &[IndeterminateDeny]).decision, IndeterminateDeny);
        assert_eq!(run(Permit, &[Deny, IndeterminateDeny]).decision, Deny);
    }

    #[test]
    fn generic_indeterminate_dominates_and_keeps_its_decision() {
        use Decision::*;
        assert_eq!(run(Deny, &[Permit, Indeterminate, IndeterminateDeny]).decision, Indeterminate);
    }

    #[test]
    fn indeterminate_results_of_one_kind_are_merged() {
        let first = EvaluationResult::processing_error(Decision::IndeterminateDeny, "first");
        let second = EvaluationResult::processing_error(Decision::IndeterminateDeny, "second");
        let state = match OverridesState::default().accumulate(Decision::Deny, first) {
            Step::Continue(s) => s,
            other => panic!("expected Continue, got {:?}", other),
        };
        let state = match state.accumulate(Decision::Deny, second) {
            Step::Continue(s) => s,
            other => panic!("expected Continue, got {:?}", other),
        };
        let result = state.resolve();
        assert_eq!(result.decision, Decision::IndeterminateDeny);
        assert_eq!(result.status.message(), "first; second");
    }

    #[test]
    fn deny_with_permit_reachable_keeps_deny_branch_status() {
        let ind_d = EvaluationResult::processing_error(Decision::IndeterminateDeny, "rule failed");
        let state = match OverridesState::default().accumulate(Decision::Deny, ind_d) {
            Step::Continue(s) => s,
            other => panic!("expected Continue, got {:?}", other),
        };
        let state = match state.accumulate(Decision::Deny, EvaluationResult::new(Decision::Permit)) {
            Step::Continue(s) => s,
            other => panic!("expected Continue, got {:?}", other),
        };
        let result = state.resolve();
        assert_eq!(result.decision, Decision::IndeterminateDenyPermit);
        assert_eq!(result.status, Status::processing_error("rule failed"));
    }

    #[test]
    fn unless_merges_fallback_obligations() {
        let mut deny = EvaluationResult::new(Decision::Deny);
        deny.add_obligations([Obligation::new("audit")]);
        let state = match UnlessState::new(Decision::Deny).accumulate(deny) {
            Step::Continue(s) => s,
            other => panic!("expected Continue, got {:?}", other),
        };
        let state = match state.accumulate(EvaluationResult::new(Decision::IndeterminatePermit)) {
            Step::Continue(s) => s,
            other => panic!("expected Continue, got {:?}", other),
        };
        let result = state.resolve();
        assert_eq!(result.decision, Decision::Deny);
        assert_eq!(result.obligations.len(), 1);
        assert!(result.status.is_ok());
    }
}
