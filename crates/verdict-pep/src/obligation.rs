//! Routing obligations to the handlers that can carry them out.
//!
//! Routing is request-scoped: [`ObligationRouter::route`] returns a
//! [`RoutedObligations`] value holding each handler's share, and nothing is
//! stored on the router between requests.

use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use verdict_contracts::{
    error::{VerdictError, VerdictResult},
    obligation::Obligation,
};

/// Carries out the obligations it matches.
pub trait ObligationHandler: Send + Sync {
    /// Stable name, used in logs and to look up a handler's share.
    fn name(&self) -> &str;

    fn matches(&self, obligation: &Obligation) -> bool;

    fn handle(&self, obligations: &[Obligation]) -> VerdictResult<()>;
}

/// The registered handlers, in registration order.
#[derive(Default, Clone)]
pub struct ObligationRouter {
    handlers: Vec<Arc<dyn ObligationHandler>>,
}

impl ObligationRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: Arc<dyn ObligationHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn register(&mut self, handler: Arc<dyn ObligationHandler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Assign every obligation to every handler that matches it.
    ///
    /// Returns `VerdictError::UnhandleableObligation` for the first
    /// obligation no handler matches; nothing is routed in that case.
    pub fn route(&self, obligations: &[Obligation]) -> VerdictResult<RoutedObligations> {
        let mut routes: Vec<(Arc<dyn ObligationHandler>, Vec<Obligation>)> = Vec::new();
        for obligation in obligations {
            let mut handled = false;
            for handler in self.handlers.iter().filter(|h| h.matches(obligation)) {
                handled = true;
                debug!(obligation_id = %obligation.id, handler = handler.name(), "obligation matched");
                let share = match routes.iter().position(|(h, _)| Arc::ptr_eq(h, handler)) {
                    Some(index) => &mut routes[index].1,
                    None => {
                        routes.push((Arc::clone(handler), Vec::new()));
                        let last = routes.len() - 1;
                        &mut routes[last].1
                    }
                };
                if !share.contains(obligation) {
                    share.push(obligation.clone());
                }
            }
            if !handled {
                warn!(obligation_id = %obligation.id, "no handler for obligation");
                return Err(VerdictError::UnhandleableObligation {
                    obligation_id: obligation.id.clone(),
                });
            }
        }
        Ok(RoutedObligations { routes })
    }
}

impl fmt::Debug for ObligationRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.handlers.iter().map(|h| h.name())).finish()
    }
}

/// The obligations of one response, grouped by handler.
pub struct RoutedObligations {
    routes: Vec<(Arc<dyn ObligationHandler>, Vec<Obligation>)>,
}

impl RoutedObligations {
    /// The obligations routed to the handler named `name`.
    pub fn for_handler(&self, name: &str) -> &[Obligation] {
        self.routes
            .iter()
            .find(|(h, _)| h.name() == name)
            .map(|(_, obligations)| obligations.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Hand each handler its share, stopping at the first failure.
    pub fn dispatch(self) -> VerdictResult<()> {
        for (handler, obligations) in &self.routes {
            debug!(handler = handler.name(), obligations = obligations.len(), "dispatching obligations");
            handler.handle(obligations)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RoutedObligations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.routes.iter().map(|(h, o)| (h.name().to_string(), o.len())))
            .finish()
    }
}
