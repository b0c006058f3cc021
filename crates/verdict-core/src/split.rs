//! The standard scope resolver: one individual request per combination of
//! repeated attribute categories.

use tracing::debug;

use verdict_contracts::{
    attribute::AttributeCategory,
    error::VerdictResult,
    request::{IndividualDecisionRequest, Request},
};

use crate::traits::ScopeResolver;

/// Splits a request whose category ids repeat into the cartesian product of
/// one category per id.
///
/// Category ids keep the order of their first appearance; within an id,
/// alternatives keep request order. The first id varies slowest. A request
/// without repetitions yields exactly one individual request.
#[derive(Debug, Default, Clone, Copy)]
pub struct RepeatedCategoriesSplitter;

impl RepeatedCategoriesSplitter {
    fn group(categories: &[AttributeCategory]) -> Vec<Vec<&AttributeCategory>> {
        let mut groups: Vec<Vec<&AttributeCategory>> = Vec::new();
        for category in categories {
            match groups.iter_mut().find(|g| g[0].category == category.category) {
                Some(group) => group.push(category),
                None => groups.push(vec![category]),
            }
        }
        groups
    }
}

impl ScopeResolver for RepeatedCategoriesSplitter {
    fn split(&self, request: &Request) -> VerdictResult<Vec<IndividualDecisionRequest>> {
        let groups = Self::group(&request.categories);

        let mut combinations: Vec<Vec<AttributeCategory>> = vec![Vec::new()];
        for group in &groups {
            combinations = combinations
                .into_iter()
                .flat_map(|prefix| {
                    group.iter().map(move |alternative| {
                        let mut next = prefix.clone();
                        next.push((*alternative).clone());
                        next
                    })
                })
                .collect();
        }

        debug!(
            categories = request.categories.len(),
            individual_requests = combinations.len(),
            "split request"
        );

        Ok(combinations
            .into_iter()
            .map(|categories| IndividualDecisionRequest {
                status: request.status.clone(),
                categories,
            })
            .collect())
    }
}
