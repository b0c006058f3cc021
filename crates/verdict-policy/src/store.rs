//! The policy store and the standard evaluation context built over it.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    path::Path,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use verdict_contracts::{
    error::{VerdictError, VerdictResult},
    request::IndividualDecisionRequest,
    status::Status,
};
use verdict_core::traits::{
    EvaluationContext, EvaluationContextFactory, MatchResult, PolicyDef, PolicyFinderResult,
};

use crate::policy::{Policy, PolicySet};

pub const MORE_THAN_ONE_ROOT: &str = "More than one applicable root policy";

/// The on-disk form of a policy store.
///
/// ```toml
/// roots = ["urn:example:policy-set:hospital"]
///
/// [[policy_sets]]
/// id = "urn:example:policy-set:hospital"
/// algorithm = "deny-overrides"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub policy_sets: Vec<PolicySet>,
    /// Ids of the root documents. Empty means every document is a root.
    #[serde(default)]
    pub roots: Vec<String>,
}

/// Immutable once built; shared read-only by every evaluation.
#[derive(Default)]
pub struct PolicyStore {
    roots: Vec<Arc<dyn PolicyDef>>,
    by_id: HashMap<String, Arc<dyn PolicyDef>>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root policy; it is also reachable by reference.
    ///
    /// Returns `VerdictError::ConfigError` for a duplicate id or a reference cycle.
    pub fn add_root(&mut self, policy: impl PolicyDef + 'static) -> VerdictResult<()> {
        let policy: Arc<dyn PolicyDef> = Arc::new(policy);
        self.insert(Arc::clone(&policy))?;
        self.roots.push(policy);
        Ok(())
    }

    /// Add a policy reachable only by reference.
    ///
    /// Returns `VerdictError::ConfigError` for a duplicate id or a reference cycle.
    pub fn add(&mut self, policy: impl PolicyDef + 'static) -> VerdictResult<()> {
        self.insert(Arc::new(policy))
    }

    fn insert(&mut self, policy: Arc<dyn PolicyDef>) -> VerdictResult<()> {
        let id = policy.identifier().id;
        if self.by_id.contains_key(&id) {
            return Err(VerdictError::ConfigError { reason: format!("duplicate policy id '{}'", id) });
        }
        self.by_id.insert(id.clone(), policy);
        if let Err(e) = self.check_references() {
            self.by_id.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    /// Fails on the first reference cycle among stored definitions.
    ///
    /// References to ids the store does not hold are left to evaluation, which
    /// reports them as Indeterminate.
    fn check_references(&self) -> VerdictResult<()> {
        let mut finished: HashSet<&str> = HashSet::new();
        let mut ids: Vec<&str> = self.by_id.keys().map(String::as_str).collect();
        ids.sort_unstable();
        for id in ids {
            let mut path = Vec::new();
            self.visit(id, &mut path, &mut finished)?;
        }
        Ok(())
    }

    fn visit<'s>(
        &'s self,
        id: &'s str,
        path: &mut Vec<&'s str>,
        finished: &mut HashSet<&'s str>,
    ) -> VerdictResult<()> {
        if finished.contains(id) {
            return Ok(());
        }
        if path.contains(&id) {
            path.push(id);
            return Err(VerdictError::ConfigError {
                reason: format!("policy reference cycle: {}", path.join(" -> ")),
            });
        }
        let Some((key, policy)) = self.by_id.get_key_value(id) else {
            return Ok(());
        };
        path.push(key.as_str());
        for target in policy.referenced_ids() {
            if let Some((target, _)) = self.by_id.get_key_value(&target) {
                self.visit(target.as_str(), path, finished)?;
            }
        }
        path.pop();
        finished.insert(key.as_str());
        Ok(())
    }

    /// Build a store from a parsed document.
    ///
    /// Returns `VerdictError::ConfigError` for duplicate ids, unknown root
    /// ids, reference cycles, or a policy using a policy-only combining
    /// algorithm over rules.
    pub fn from_document(document: PolicyDocument) -> VerdictResult<Self> {
        let mut entries: Vec<(String, Arc<dyn PolicyDef>)> = Vec::new();
        for policy in document.policies {
            if policy.algorithm.rule_id().is_none() {
                return Err(VerdictError::ConfigError {
                    reason: format!(
                        "policy '{}' uses '{}', which cannot combine rules",
                        policy.id, policy.algorithm
                    ),
                });
            }
            let id = policy.id.clone();
            let policy: Arc<dyn PolicyDef> = Arc::new(policy);
            entries.push((id, policy));
        }
        for set in document.policy_sets {
            let id = set.id.clone();
            let set: Arc<dyn PolicyDef> = Arc::new(set);
            entries.push((id, set));
        }

        let mut store = Self::new();
        for (id, policy) in &entries {
            if store.by_id.insert(id.clone(), Arc::clone(policy)).is_some() {
                return Err(VerdictError::ConfigError {
                    reason: format!("duplicate policy id '{}'", id),
                });
            }
        }
        store.check_references()?;
        if document.roots.is_empty() {
            store.roots = entries.into_iter().map(|(_, policy)| policy).collect();
        } else {
            for id in &document.roots {
                let root = store.by_id.get(id).ok_or_else(|| VerdictError::ConfigError {
                    reason: format!("root '{}' is not defined in the document", id),
                })?;
                store.roots.push(Arc::clone(root));
            }
        }
        info!(policies = store.by_id.len(), roots = store.roots.len(), "policy store loaded");
        Ok(store)
    }

    /// Returns `VerdictError::ConfigError` if `s` is not a valid policy document.
    pub fn from_toml_str(s: &str) -> VerdictResult<Self> {
        let document: PolicyDocument = toml::from_str(s).map_err(|e| VerdictError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;
        Self::from_document(document)
    }

    pub fn from_file(path: &Path) -> VerdictResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VerdictError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn PolicyDef>> {
        self.by_id.get(id).cloned()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Select the single root applicable to the request in `context`.
    ///
    /// A root whose target is Indeterminate still counts as applicable; its
    /// evaluation reports the failure.
    pub fn root_for(&self, context: &dyn EvaluationContext) -> PolicyFinderResult {
        let mut selected: Option<&Arc<dyn PolicyDef>> = None;
        for root in &self.roots {
            if root.target_match(context) == MatchResult::NoMatch {
                continue;
            }
            if selected.is_some() {
                debug!(second = %root.identifier().id, "more than one applicable root policy");
                return PolicyFinderResult::error(Status::processing_error(MORE_THAN_ONE_ROOT));
            }
            selected = Some(root);
        }
        match selected {
            Some(root) => PolicyFinderResult::found(Arc::clone(root)),
            None => PolicyFinderResult::not_found(),
        }
    }
}

impl fmt::Debug for PolicyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyStore")
            .field("roots", &self.roots.iter().map(|p| p.identifier()).collect::<Vec<_>>())
            .field("policies", &self.by_id.len())
            .finish()
    }
}

// ── Evaluation context ────────────────────────────────────────────────────────

/// Reads attributes straight from the request and policies from a store.
pub struct StdEvaluationContext<'a> {
    request: IndividualDecisionRequest,
    store: &'a PolicyStore,
}

impl<'a> StdEvaluationContext<'a> {
    pub fn new(request: IndividualDecisionRequest, store: &'a PolicyStore) -> Self {
        Self { request, store }
    }
}

impl EvaluationContext for StdEvaluationContext<'_> {
    fn request(&self) -> &IndividualDecisionRequest {
        &self.request
    }

    fn root_policy(&self) -> PolicyFinderResult {
        self.store.root_for(self)
    }

    fn policy_by_id(&self, id: &str) -> Option<Arc<dyn PolicyDef>> {
        self.store.get(id)
    }
}

/// Hands every individual request a [`StdEvaluationContext`] over one store.
#[derive(Debug, Clone)]
pub struct StdEvaluationContextFactory {
    store: Arc<PolicyStore>,
}

impl StdEvaluationContextFactory {
    pub fn new(store: Arc<PolicyStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PolicyStore {
        &self.store
    }
}

impl EvaluationContextFactory for StdEvaluationContextFactory {
    fn context_for<'a>(
        &'a self,
        request: &IndividualDecisionRequest,
    ) -> VerdictResult<Option<Box<dyn EvaluationContext + 'a>>> {
        Ok(Some(Box::new(StdEvaluationContext::new(request.clone(), &self.store))))
    }
}
