//! Listener for hosts that own the transport themselves.
//!
//! Function platforms and workers deliver requests to a callback instead of
//! a socket. This listener binds nothing; the host calls the
//! [`RouterService`] from [`Listening::service`]. Such hosts cannot be told
//! to stop accepting, so an abort signal is rejected.

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::http::request::DEFAULT_AUTHORITY;
use crate::net::{ListenError, ListenOptions, Listener, Listening, RouterService};
use crate::routing::Router;

#[derive(Debug, Clone)]
pub struct EmbeddedListener {
    default_authority: String,
}

impl EmbeddedListener {
    pub fn new() -> Self {
        Self {
            default_authority: DEFAULT_AUTHORITY.to_owned(),
        }
    }

    pub fn with_default_authority(mut self, authority: impl Into<String>) -> Self {
        self.default_authority = authority.into();
        self
    }
}

impl Default for EmbeddedListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for EmbeddedListener {
    fn listen(&self, router: Router, options: ListenOptions) -> BoxFuture<'static, Result<Listening, ListenError>> {
        if options.signal.is_some() {
            return future::ready(Err(ListenError::AbortUnsupported)).boxed();
        }
        if options.port.is_some() || options.host.is_some() {
            tracing::debug!("Embedded listener ignores host and port");
        }

        let service = RouterService::new(router.clone()).with_default_authority(self.default_authority.as_str());
        future::ready(Ok(Listening::new(router, service, None, None))).boxed()
    }
}
