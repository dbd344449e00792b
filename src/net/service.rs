//! Platform request adapter.
//!
//! # Responsibilities
//! - Translate `http::Request<Body>` into the canonical `Request`
//! - Bound concurrent dispatches via semaphore
//! - Dispatch and record request metrics
//! - Answer failures that escape the router
//!
//! # Design Decisions
//! - Infallible as a `tower::Service`; every outcome is a response
//! - Malformed requests get 400, escaped failures 500

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::StatusCode;
use futures_util::future::{BoxFuture, FutureExt};
use tokio::sync::Semaphore;

use crate::http::request::{Request, DEFAULT_AUTHORITY};
use crate::http::response::{status_response, Response};
use crate::observability::metrics;
use crate::routing::Router;

/// `tower::Service` dispatching platform requests through a [`Router`].
#[derive(Clone)]
pub struct RouterService {
    router: Router,
    default_authority: Arc<str>,
    /// Semaphore to limit concurrent dispatches.
    in_flight: Option<Arc<Semaphore>>,
}

impl RouterService {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            default_authority: Arc::from(DEFAULT_AUTHORITY),
            in_flight: None,
        }
    }

    /// Authority used for requests without a `Host` header.
    pub fn with_default_authority(mut self, authority: impl Into<Arc<str>>) -> Self {
        self.default_authority = authority.into();
        self
    }

    /// Limit concurrent dispatches; further requests wait for a slot.
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.in_flight = Some(Arc::new(Semaphore::new(max)));
        self
    }

    /// Get current available dispatch slots, if limited.
    pub fn available_permits(&self) -> Option<usize> {
        self.in_flight.as_ref().map(|s| s.available_permits())
    }

    /// Serve one platform request.
    pub async fn respond(&self, request: axum::http::Request<Body>) -> Response {
        let start_time = Instant::now();
        let method = request.method().clone();

        // Acquire permit first (backpressure)
        let _permit = match &self.in_flight {
            Some(limit) => match Arc::clone(limit).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::error!("Dispatch semaphore closed");
                    return status_response(StatusCode::SERVICE_UNAVAILABLE);
                }
            },
            None => None,
        };

        let response = match Request::from_http(request, &self.default_authority) {
            Ok(request) => match self.router.dispatch(request).await {
                Ok(response) => response,
                Err(failure) => {
                    tracing::error!(method = %method, error = %failure, "Dispatch failed");
                    status_response(StatusCode::INTERNAL_SERVER_ERROR)
                }
            },
            Err(e) => {
                tracing::warn!(method = %method, error = %e, "Rejecting malformed request");
                status_response(StatusCode::BAD_REQUEST)
            }
        };

        metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
        response
    }
}

impl fmt::Debug for RouterService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterService")
            .field("default_authority", &self.default_authority)
            .field("available_permits", &self.available_permits())
            .finish_non_exhaustive()
    }
}

impl tower::Service<axum::http::Request<Body>> for RouterService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: axum::http::Request<Body>) -> Self::Future {
        let service = self.clone();
        async move { Ok(service.respond(request).await) }.boxed()
    }
}
