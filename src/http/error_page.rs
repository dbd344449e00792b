//! Minimal hardened error pages.
//!
//! # Responsibilities
//! - Render a small HTML body for a status code
//! - Attach hardening headers (no sniffing, no referrer, no framing)
//! - Act as a catch-all error handler

use axum::body::Body;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::StatusCode;
use futures_util::future::{self, BoxFuture, FutureExt};
use url::Url;

use crate::http::request::Request;
use crate::http::response::{Failure, HandlerResult, Reply, Response};
use crate::routing::handler::ErrorHandler;

const CONTENT_TRANSFER_ENCODING: HeaderName = HeaderName::from_static("content-transfer-encoding");

const HARDENING_HEADERS: [(HeaderName, &str); 7] = [
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'none'; frame-ancestors 'none'; upgrade-insecure-requests",
    ),
    (CONTENT_TRANSFER_ENCODING, "7bit"),
    (header::CONTENT_TYPE, "text/html; charset=US-ASCII"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
];

/// Render the error page for `status`.
///
/// Codes without a standard reason phrase get an empty body.
pub fn render(status: StatusCode) -> Response {
    let body = match status.canonical_reason() {
        Some(reason) => Body::from(format!(
            "<!DOCTYPE html><html><head><title>{code} {reason}</title></head>\
             <body><h1>{code} {reason}</h1></body></html>",
            code = status.as_u16(),
        )),
        None => Body::empty(),
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    for (name, value) in HARDENING_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

/// Status an error page should report for `failure`.
///
/// Raised statuses, raised responses and `ResponseError`s keep their own
/// code; anything else is a 500.
pub fn failure_status(failure: &Failure) -> StatusCode {
    failure.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Error handler answering failures with a rendered error page.
///
/// A raised response is left alone: the accumulator passes through
/// unchanged, so the raised response itself reaches the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPage;

impl ErrorHandler for ErrorPage {
    fn call(
        &self,
        failure: &Failure,
        _request: Request,
        prior: Reply,
        _url: Url,
    ) -> BoxFuture<'static, HandlerResult> {
        if let Failure::Response(_) = failure {
            return future::ready(Ok(prior)).boxed();
        }

        let status = failure_status(failure);
        tracing::debug!(status = %status, "Rendering error page");
        future::ready(Ok(Reply::Response(render(status)))).boxed()
    }
}
