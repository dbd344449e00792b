//! Append-only route table.
//!
//! # Responsibilities
//! - Store `(method-filter, path-filter, handler)` rules in registration order
//! - Hand out a snapshot of matching handlers per request
//!
//! # Design Decisions
//! - Rules are never removed or reordered
//! - Appends are read-copy-update through `ArcSwap`; readers never block
//! - A dispatch works on the snapshot it loaded; later appends are not seen

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::Method;

use crate::routing::matcher::{Matcher, MethodFilter, PathFilter};

/// One registered rule.
pub struct Rule<H: ?Sized> {
    pub methods: MethodFilter,
    pub path: PathFilter,
    pub handler: Arc<H>,
}

impl<H: ?Sized> Rule<H> {
    pub fn new(methods: MethodFilter, path: PathFilter, handler: Arc<H>) -> Self {
        Self {
            methods,
            path,
            handler,
        }
    }
}

// Derive would require `H: Clone`.
impl<H: ?Sized> Clone for Rule<H> {
    fn clone(&self) -> Self {
        Self {
            methods: self.methods.clone(),
            path: self.path.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H: ?Sized> fmt::Debug for Rule<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("methods", &self.methods)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<H: ?Sized + Send + Sync> Matcher for Rule<H> {
    fn matches(&self, method: &Method, path: &str) -> bool {
        self.methods.matches(method, path) && self.path.matches(method, path)
    }
}

/// Ordered, append-only list of rules.
pub struct RouteTable<H: ?Sized> {
    rules: ArcSwap<Vec<Rule<H>>>,
}

impl<H: ?Sized + Send + Sync> RouteTable<H> {
    pub fn new() -> Self {
        Self {
            rules: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append a rule after every existing one.
    pub fn push(&self, rule: Rule<H>) {
        self.rules.rcu(|rules| {
            let mut next = Vec::with_capacity(rules.len() + 1);
            next.extend(rules.iter().cloned());
            next.push(rule.clone());
            next
        });
    }

    /// Handlers of every rule matching `method` and `path`, in registration order.
    pub fn matching(&self, method: &Method, path: &str) -> Vec<Arc<H>> {
        self.rules
            .load()
            .iter()
            .filter(|rule| rule.matches(method, path))
            .map(|rule| Arc::clone(&rule.handler))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: ?Sized + Send + Sync> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for RouteTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.load().iter()).finish()
    }
}
