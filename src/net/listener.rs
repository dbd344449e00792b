//! TCP listener implementation.
//!
//! # Responsibilities
//! - Bind to the requested host and port
//! - Serve HTTP/1.1 and HTTP/2 via axum
//! - Attach request IDs and HTTP tracing
//! - Stop accepting on the abort signal, letting in-flight requests finish

use std::net::SocketAddr;

use futures_util::future::{BoxFuture, FutureExt};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ListenerConfig;
use crate::lifecycle::ShutdownSignal;
use crate::net::{ListenError, ListenOptions, Listener, Listening, RouterService};
use crate::routing::Router;

/// Listener owning a TCP socket.
#[derive(Debug, Clone)]
pub struct SocketListener {
    config: ListenerConfig,
}

impl SocketListener {
    pub fn new(config: ListenerConfig) -> Self {
        Self { config }
    }
}

impl Default for SocketListener {
    fn default() -> Self {
        Self::new(ListenerConfig::default())
    }
}

impl Listener for SocketListener {
    fn listen(&self, router: Router, options: ListenOptions) -> BoxFuture<'static, Result<Listening, ListenError>> {
        let config = self.config.clone();

        async move {
            let host = options.host.unwrap_or(config.host);
            let port = options.port.unwrap_or(config.port);

            let listener = TcpListener::bind((host.as_str(), port))
                .await
                .map_err(|source| ListenError::Bind {
                    address: format!("{host}:{port}"),
                    source,
                })?;
            let local_addr = listener.local_addr().map_err(ListenError::Serve)?;

            tracing::info!(
                address = %local_addr,
                max_in_flight = config.max_in_flight,
                "Listener bound"
            );

            let service = RouterService::new(router.clone())
                .with_default_authority(config.default_authority)
                .with_max_in_flight(config.max_in_flight);

            let task = tokio::spawn(serve(listener, service.clone(), local_addr, options.signal));

            Ok(Listening::new(router, service, Some(local_addr), Some(task)))
        }
        .boxed()
    }
}

async fn serve(
    listener: TcpListener,
    service: RouterService,
    local_addr: SocketAddr,
    signal: Option<ShutdownSignal>,
) -> std::io::Result<()> {
    let app = axum::Router::new().fallback_service(service).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            match signal {
                Some(signal) => signal.recv().await,
                None => std::future::pending().await,
            }
        })
        .await?;

    tracing::info!(address = %local_addr, "Listener stopped");
    Ok(())
}
