//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, StatusCode};
use futures_util::future::join_all;

use switchyard::{Request, Response, Router};

/// Build a canonical request, allowing non-standard method tokens.
pub fn request(method: &str, url: &str) -> Request {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    Request::new(method, url).unwrap()
}

/// Dispatch every request concurrently and collect the response statuses.
pub async fn statuses(router: &Router, requests: Vec<Request>) -> Vec<u16> {
    let responses = join_all(requests.into_iter().map(|r| router.dispatch(r))).await;
    responses
        .into_iter()
        .map(|r| r.expect("guarded router never fails").status().as_u16())
        .collect()
}

/// Response with the given status and body.
pub fn response(status: u16, body: impl Into<Body>) -> Response {
    axum::http::Response::builder()
        .status(StatusCode::from_u16(status).unwrap())
        .body(body.into())
        .unwrap()
}

/// Collect a response body as UTF-8 text.
pub async fn text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// HTTP client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
