//! Canonical HTTP contract between listeners and the router.
//!
//! # Data Flow
//! ```text
//! Platform request (http::Request<Body>)
//!     → request.rs (canonical Request: method, url, headers, body)
//!     → [router pipeline]
//!     → response.rs (Reply / Failure → Response)
//!     → error_page.rs (optional rendered error body)
//!     → Platform response
//! ```

pub mod error_page;
pub mod request;
pub mod response;
pub mod server;

pub use request::{Request, RequestError, DEFAULT_AUTHORITY};
pub use response::{BoxError, Failure, HandlerResult, Reply, Response, ResponseError};
pub use server::Server;
