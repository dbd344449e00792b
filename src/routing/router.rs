//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Own the normal and error route tables
//! - Filter rules for a request and run them as a pipeline
//! - Redirect raised failures into the error pipeline
//! - Coerce unresolved failures when guarding is enabled
//!
//! # Design Decisions
//! - Cheap to clone; clones share the same tables
//! - A router is itself a handler, so routers nest without a separate type
//! - A nested router's 501 is a normal reply for the parent, not a failure

use std::fmt;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use url::Url;

use crate::http::request::Request;
use crate::http::response::{Failure, HandlerResult, Reply, Response};
use crate::routing::handler::{ErrorHandler, Handler};
use crate::routing::pipeline::{self, Recovery};
use crate::routing::registration::Routes;
use crate::routing::table::{RouteTable, Rule};

/// Request router with fluent registration (see [`Routes`]).
#[derive(Clone)]
pub struct Router {
    inner: Arc<Inner>,
}

struct Inner {
    requests: RouteTable<dyn Handler>,
    errors: RouteTable<dyn ErrorHandler>,
    guard_unhandled: bool,
}

impl Router {
    /// Create a router that converts unresolved failures into responses.
    pub fn new() -> Self {
        Self::with_guard(true)
    }

    /// Create a router that hands unresolved failures back to the caller.
    pub fn unguarded() -> Self {
        Self::with_guard(false)
    }

    pub fn with_guard(guard_unhandled: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                requests: RouteTable::new(),
                errors: RouteTable::new(),
                guard_unhandled,
            }),
        }
    }

    pub fn guards_unhandled(&self) -> bool {
        self.inner.guard_unhandled
    }

    pub(crate) fn push_request(&self, rule: Rule<dyn Handler>) {
        self.inner.requests.push(rule);
    }

    pub(crate) fn push_error(&self, rule: Rule<dyn ErrorHandler>) {
        self.inner.errors.push(rule);
    }

    /// Number of registered `(normal, error)` rules.
    pub fn rule_counts(&self) -> (usize, usize) {
        (self.inner.requests.len(), self.inner.errors.len())
    }

    /// Dispatch a request.
    ///
    /// Returns `Err` only for an unguarded router whose failure no error
    /// handler resolved; the failure is the one originally raised.
    pub async fn dispatch(&self, request: Request) -> Result<Response, Failure> {
        let url = request.url().clone();
        let stages = self.inner.requests.matching(request.method(), url.path());

        tracing::debug!(
            method = %request.method(),
            path = url.path(),
            stages = stages.len(),
            "Dispatching request"
        );

        let outcome = match pipeline::reduce(stages, &request, &url).await {
            Ok(reply) => Ok(reply.into_response()),
            Err(failure) => self.recover(failure, &request, &url).await,
        };

        match outcome {
            Ok(response) => Ok(response),
            Err(failure) if self.inner.guard_unhandled => {
                tracing::warn!(
                    method = %request.method(),
                    path = url.path(),
                    error = %failure,
                    "Unhandled failure"
                );
                Ok(failure.into_response())
            }
            Err(failure) => Err(failure),
        }
    }

    async fn recover(&self, failure: Failure, request: &Request, url: &Url) -> Result<Response, Failure> {
        let stages = self.inner.errors.matching(request.method(), url.path());
        if stages.is_empty() {
            return Err(failure);
        }

        tracing::debug!(
            path = url.path(),
            stages = stages.len(),
            error = %failure,
            "Running error handlers"
        );

        match pipeline::reduce_errors(stages, failure, request, url).await {
            Recovery::Resolved(reply) => Ok(reply.into_response()),
            Recovery::Unresolved(failure) => Err(failure),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("requests", &self.inner.requests)
            .field("errors", &self.inner.errors)
            .field("guard_unhandled", &self.inner.guard_unhandled)
            .finish()
    }
}

impl Routes for Router {
    fn router(&self) -> &Router {
        self
    }
}

impl Handler for Router {
    fn call(&self, request: Request, _prior: Reply, _url: Url) -> BoxFuture<'static, HandlerResult> {
        let router = self.clone();
        async move { router.dispatch(request).await.map(Reply::Response) }.boxed()
    }
}
