//! `/.well-known/time`: lets clients read the server clock from the `Date`
//! header of a cheap, uncacheable response.

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, DATE};
use axum::http::{HeaderValue, StatusCode};
use chrono::Utc;

use crate::http::response::{Reply, Response};
use crate::routing::handler::sync;
use crate::routing::{Routes, Verb};

pub const PATH: &str = "/.well-known/time";

/// Current time formatted as an HTTP date (RFC 7231 IMF-fixdate).
pub fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn time_response() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;

    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Ok(date) = HeaderValue::from_str(&http_date()) {
        headers.insert(DATE, date);
    }
    response
}

/// Register `GET`/`HEAD /.well-known/time` on `target`.
pub fn register_time<R: Routes>(target: &R) -> &R {
    target.route([Verb::Get, Verb::Head], PATH, sync(|_, _, _| Ok(Reply::Response(time_response()))))
}
