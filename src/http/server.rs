//! Server: a router paired with a platform listener.
//!
//! # Responsibilities
//! - Expose the full registration surface of the wrapped router
//! - Start the listener with the router as its dispatch target
//!
//! # Design Decisions
//! - Registration on the server and on `router()` hit the same tables
//! - Listening does not freeze registration; later rules apply to later requests

use crate::net::{ListenError, ListenOptions, Listener, Listening};
use crate::routing::{Router, Routes};

/// HTTP server for a router.
#[derive(Debug)]
pub struct Server<L> {
    router: Router,
    listener: L,
}

impl<L: Listener> Server<L> {
    /// Create a server with a fresh guarded router.
    pub fn new(listener: L) -> Self {
        Self::with_router(Router::new(), listener)
    }

    /// Create a server around an existing router.
    pub fn with_router(router: Router, listener: L) -> Self {
        Self { router, listener }
    }

    /// Start accepting requests.
    ///
    /// Resolves once the listener is accepting; fails if it cannot bind.
    pub async fn listen(&self, options: ListenOptions) -> Result<Listening, ListenError> {
        let (requests, errors) = self.router.rule_counts();
        tracing::info!(
            request_rules = requests,
            error_rules = errors,
            guard_unhandled = self.router.guards_unhandled(),
            "Server starting"
        );

        self.listener.listen(self.router.clone(), options).await
    }
}

impl<L> Routes for Server<L> {
    fn router(&self) -> &Router {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use crate::net::EmbeddedListener;
    use crate::routing::handler::status;
    use axum::body::Body;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_registration_chains_on_server() {
        let server = Server::new(EmbeddedListener::new());
        server
            .get("/a", status(StatusCode::OK))
            .post("/a", status(StatusCode::CREATED));

        let listening = server.listen(ListenOptions::new()).await.unwrap();
        let request = axum::http::Request::post("/a").body(Body::empty()).unwrap();
        let response = listening.service().respond(request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_embedded_rejects_abort() {
        let server = Server::new(EmbeddedListener::new());
        let shutdown = Shutdown::new();

        let err = server
            .listen(ListenOptions::new().abort_on(shutdown.subscribe()))
            .await
            .unwrap_err();
        assert!(matches!(err, ListenError::AbortUnsupported));
    }
}
