//! Listener subsystem.
//!
//! # Data Flow
//! ```text
//! Server::listen(options)
//!     → Listener::listen(router, options)
//!     → listener.rs (bind TCP socket, axum serve loop)
//!       or embedded.rs (no socket, host runtime drives the service)
//!     → service.rs (platform request → canonical Request → Router → Response)
//!
//! Abort signal fires:
//!     → stop accepting → in-flight dispatches finish → Listening::wait returns
//! ```
//!
//! # Design Decisions
//! - A listener resolves once it is accepting, not when it stops
//! - Listeners that cannot stop on request reject an abort signal up front
//! - A failure escaping an unguarded router is answered with 500

pub mod embedded;
pub mod listener;
pub mod service;

use std::net::SocketAddr;

use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::lifecycle::ShutdownSignal;
use crate::routing::Router;

pub use embedded::EmbeddedListener;
pub use listener::SocketListener;
pub use service::RouterService;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenError {
    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The serve loop failed after binding.
    #[error("listener failed: {0}")]
    Serve(#[source] std::io::Error),

    /// The serve task panicked or was cancelled.
    #[error("listener task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// This listener has no way to stop on an abort signal.
    #[error("abort operation not supported by this listener")]
    AbortUnsupported,
}

/// Options for [`Listener::listen`]; every field is optional.
#[derive(Debug, Default)]
pub struct ListenOptions {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub signal: Option<ShutdownSignal>,
}

impl ListenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Stop accepting connections once `signal` fires.
    pub fn abort_on(mut self, signal: ShutdownSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// Platform listener: turns a router into something that accepts traffic.
pub trait Listener: Send + Sync {
    /// Start accepting; resolves once listening has started.
    fn listen(&self, router: Router, options: ListenOptions) -> BoxFuture<'static, Result<Listening, ListenError>>;
}

/// Handle to a started listener.
#[derive(Debug)]
pub struct Listening {
    router: Router,
    service: RouterService,
    local_addr: Option<SocketAddr>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl Listening {
    pub(crate) fn new(
        router: Router,
        service: RouterService,
        local_addr: Option<SocketAddr>,
        task: Option<JoinHandle<std::io::Result<()>>>,
    ) -> Self {
        Self {
            router,
            service,
            local_addr,
            task,
        }
    }

    /// Router this listener dispatches to.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Service translating platform requests for this listener.
    pub fn service(&self) -> RouterService {
        self.service.clone()
    }

    /// Bound socket address, if the listener owns a socket.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Wait until the listener has stopped and in-flight requests finished.
    ///
    /// Returns immediately for listeners without a serve loop.
    pub async fn wait(self) -> Result<(), ListenError> {
        match self.task {
            Some(task) => task.await?.map_err(ListenError::Serve),
            None => Ok(()),
        }
    }
}
