//! Handler capabilities.
//!
//! A handler maps `(request, prior reply, url)` to the next reply, possibly
//! later. Error handlers additionally see the failure being recovered from.
//! Closures and async fns are handlers through blanket impls; `sync` and
//! `sync_error` adapt plain functions that answer immediately.

use std::future::Future;

use axum::http::StatusCode;
use futures_util::future::{self, BoxFuture, FutureExt};
use url::Url;

use crate::http::request::Request;
use crate::http::response::{Failure, HandlerResult, Reply};

/// A pipeline stage for normal dispatch.
pub trait Handler: Send + Sync + 'static {
    /// Produce the next accumulated reply.
    fn call(&self, request: Request, prior: Reply, url: Url) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request, Reply, Url) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, request: Request, prior: Reply, url: Url) -> BoxFuture<'static, HandlerResult> {
        (self)(request, prior, url).boxed()
    }
}

/// A pipeline stage for error dispatch.
///
/// The failure is only borrowed for the call itself; the returned future
/// must own whatever it needs from it.
pub trait ErrorHandler: Send + Sync + 'static {
    fn call(
        &self,
        failure: &Failure,
        request: Request,
        prior: Reply,
        url: Url,
    ) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> ErrorHandler for F
where
    F: Fn(&Failure, Request, Reply, Url) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(
        &self,
        failure: &Failure,
        request: Request,
        prior: Reply,
        url: Url,
    ) -> BoxFuture<'static, HandlerResult> {
        (self)(failure, request, prior, url).boxed()
    }
}

/// Pin down closure argument types for an async handler.
pub fn from_fn<F, Fut>(f: F) -> F
where
    F: Fn(Request, Reply, Url) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    f
}

/// Pin down closure argument types for an async error handler.
pub fn error_fn<F, Fut>(f: F) -> F
where
    F: Fn(&Failure, Request, Reply, Url) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    f
}

/// Handler wrapping a synchronous function.
#[derive(Debug, Clone)]
pub struct SyncHandler<F>(F);

/// Wrap a synchronous handler function.
pub fn sync<F>(f: F) -> SyncHandler<F>
where
    F: Fn(&Request, Reply, &Url) -> HandlerResult + Send + Sync + 'static,
{
    SyncHandler(f)
}

impl<F> Handler for SyncHandler<F>
where
    F: Fn(&Request, Reply, &Url) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, request: Request, prior: Reply, url: Url) -> BoxFuture<'static, HandlerResult> {
        future::ready((self.0)(&request, prior, &url)).boxed()
    }
}

/// Error handler wrapping a synchronous function.
#[derive(Debug, Clone)]
pub struct SyncErrorHandler<F>(F);

/// Wrap a synchronous error handler function.
pub fn sync_error<F>(f: F) -> SyncErrorHandler<F>
where
    F: Fn(&Failure, &Request, Reply, &Url) -> HandlerResult + Send + Sync + 'static,
{
    SyncErrorHandler(f)
}

impl<F> ErrorHandler for SyncErrorHandler<F>
where
    F: Fn(&Failure, &Request, Reply, &Url) -> HandlerResult + Send + Sync + 'static,
{
    fn call(
        &self,
        failure: &Failure,
        request: Request,
        prior: Reply,
        url: Url,
    ) -> BoxFuture<'static, HandlerResult> {
        future::ready((self.0)(failure, &request, prior, &url)).boxed()
    }
}

/// Handler that always answers with `status`.
pub fn status(status: StatusCode) -> impl Handler + Clone {
    sync(move |_, _, _| Ok(Reply::Status(status)))
}

/// Handler that always answers "no content".
pub fn no_content() -> impl Handler + Clone {
    sync(|_, _, _| Ok(Reply::NoContent))
}

/// Handler that resets the accumulator to "unset".
pub fn unset() -> impl Handler + Clone {
    sync(|_, _, _| Ok(Reply::Unset))
}

/// Handler that raises `status` as a failure.
pub fn raise(status: StatusCode) -> impl Handler + Clone {
    sync(move |_, _, _| Err(Failure::Status(status)))
}
