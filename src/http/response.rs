//! Response values threaded through the pipeline.
//!
//! # Responsibilities
//! - Represent what a handler produced (`Reply`)
//! - Represent what a handler raised instead (`Failure`)
//! - Normalize either into a concrete `Response`
//!
//! # Design Decisions
//! - `Unset` means "nobody answered" and becomes 501
//! - `NoContent` becomes 204, a bare status becomes an empty-bodied response
//! - Raising is an `Err`, never a panic

use axum::body::Body;
use axum::http::StatusCode;

/// Concrete response type shared with the platform layer.
pub type Response = axum::http::Response<Body>;

/// A boxed error type for arbitrary handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What a pipeline stage hands to the next one.
pub type HandlerResult = Result<Reply, Failure>;

/// Accumulated response value of a pipeline.
#[derive(Debug, Default)]
pub enum Reply {
    /// No handler has produced a response yet.
    #[default]
    Unset,
    /// Explicit "no content".
    NoContent,
    /// Status-only response.
    Status(StatusCode),
    /// Fully built response.
    Response(Response),
}

impl Reply {
    pub fn is_unset(&self) -> bool {
        matches!(self, Reply::Unset)
    }

    /// Status this reply will normalize to.
    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Unset => StatusCode::NOT_IMPLEMENTED,
            Reply::NoContent => StatusCode::NO_CONTENT,
            Reply::Status(status) => *status,
            Reply::Response(response) => response.status(),
        }
    }

    /// Normalize into a concrete response.
    pub fn into_response(self) -> Response {
        match self {
            Reply::Unset => status_response(StatusCode::NOT_IMPLEMENTED),
            Reply::NoContent => status_response(StatusCode::NO_CONTENT),
            Reply::Status(status) => status_response(status),
            Reply::Response(response) => response,
        }
    }
}

impl From<StatusCode> for Reply {
    fn from(status: StatusCode) -> Self {
        Reply::Status(status)
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Response(response)
    }
}

/// A value raised by a handler instead of returned.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    /// A bare status code was raised.
    #[error("handler raised status {0}")]
    Status(StatusCode),

    /// A concrete response was raised, short-circuiting the pipeline.
    #[error("handler raised a response with status {}", .0.status())]
    Response(Response),

    /// Any other error.
    #[error(transparent)]
    Error(BoxError),
}

impl Failure {
    /// Wrap an arbitrary error.
    pub fn error(err: impl Into<BoxError>) -> Self {
        Failure::Error(err.into())
    }

    /// Status carried by the failure, if it has one of its own.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Failure::Status(status) => Some(*status),
            Failure::Response(response) => Some(response.status()),
            Failure::Error(err) => err.downcast_ref::<ResponseError>().map(ResponseError::status),
        }
    }

    /// Best-effort response for a failure nothing else resolved.
    ///
    /// Status failures become status-only responses, raised responses are
    /// used as-is, everything else is a 500.
    pub fn into_response(self) -> Response {
        match self {
            Failure::Status(status) => status_response(status),
            Failure::Response(response) => response,
            Failure::Error(_) => status_response(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl From<StatusCode> for Failure {
    fn from(status: StatusCode) -> Self {
        Failure::Status(status)
    }
}

impl From<Response> for Failure {
    fn from(response: Response) -> Self {
        Failure::Response(response)
    }
}

impl From<ResponseError> for Failure {
    fn from(err: ResponseError) -> Self {
        Failure::Error(Box::new(err))
    }
}

/// An error that knows which status it should be answered with.
#[derive(Debug, thiserror::Error)]
#[error("{status}: {}", message.as_deref().unwrap_or("response error"))]
pub struct ResponseError {
    status: StatusCode,
    message: Option<String>,
    #[source]
    cause: Option<BoxError>,
}

impl ResponseError {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
            cause: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Response with the given status and an empty body.
pub fn status_response(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}
