//! Canonical request representation.
//!
//! # Responsibilities
//! - Hold method, parsed URL, headers and an optional body stream
//! - Build from a platform `http::Request` (listener side)
//! - Stay cheap to clone so every pipeline stage gets its own handle
//!
//! # Design Decisions
//! - Immutable once built; the body is the only part that can be taken
//! - The body can be taken once; later stages see `None`
//! - `GET` and `HEAD` never carry a body

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::uri::Authority;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

/// Authority used when an incoming request has no `Host` header.
pub const DEFAULT_AUTHORITY: &str = "default.local.";

/// Error building a canonical request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request URL could not be parsed.
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

/// Canonical request handed to every handler.
#[derive(Debug, Clone)]
pub struct Request {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Mutex<Option<Body>>,
}

impl Request {
    /// Create a request without headers or body.
    pub fn new(method: Method, url: &str) -> Result<Self, RequestError> {
        Ok(Self::from_parts(method, Url::parse(url)?, HeaderMap::new(), None))
    }

    /// Shorthand for a `GET` request.
    pub fn get(url: &str) -> Result<Self, RequestError> {
        Self::new(Method::GET, url)
    }

    /// Assemble a request from already-parsed parts.
    pub fn from_parts(method: Method, url: Url, headers: HeaderMap, body: Option<Body>) -> Self {
        let body = if method == Method::GET || method == Method::HEAD {
            None
        } else {
            body
        };

        Self {
            inner: Arc::new(Inner {
                method,
                url,
                headers,
                body: Mutex::new(body),
            }),
        }
    }

    /// Translate a platform request into the canonical form.
    ///
    /// The absolute URL is rebuilt from the `Host` header, falling back to
    /// `default_authority`.
    pub fn from_http(
        request: axum::http::Request<Body>,
        default_authority: &str,
    ) -> Result<Self, RequestError> {
        let (parts, body) = request.into_parts();

        // Only a well-formed authority may come from the Host header; the
        // path always comes from the request target.
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.parse::<Authority>().ok());
        let authority = host
            .as_ref()
            .or(parts.uri.authority())
            .map(Authority::as_str)
            .unwrap_or(default_authority);
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/");

        let url = Url::parse(&format!("http://{authority}{path_and_query}"))?;

        Ok(Self::from_parts(parts.method, url, parts.headers, Some(body)))
    }

    /// Return a copy of this request with an extra header.
    ///
    /// Only usable before the request is shared; the body moves to the copy.
    pub fn with_header(self, name: HeaderName, value: HeaderValue) -> Self {
        let mut headers = self.inner.headers.clone();
        headers.append(name, value);
        let body = self.take_body();
        Self::from_parts(self.inner.method.clone(), self.inner.url.clone(), headers, body)
    }

    /// Return a copy of this request carrying `body`.
    pub fn with_body(self, body: impl Into<Body>) -> Self {
        Self::from_parts(
            self.inner.method.clone(),
            self.inner.url.clone(),
            self.inner.headers.clone(),
            Some(body.into()),
        )
    }

    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Path component used for route matching.
    pub fn path(&self) -> &str {
        self.inner.url.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Take the body stream. Returns `None` once taken, or if there never was one.
    pub fn take_body(&self) -> Option<Body> {
        match self.inner.body.lock() {
            Ok(mut body) => body.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }

    /// Whether a body is still available.
    pub fn has_body(&self) -> bool {
        match self.inner.body.lock() {
            Ok(body) => body.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }
}
