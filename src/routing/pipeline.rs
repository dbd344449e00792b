//! Sequential pipeline reducer.
//!
//! Stages run strictly one after another; each receives the reply the
//! previous stage produced, starting from `Reply::Unset`. A stage may
//! suspend without blocking other requests. A raised failure stops the
//! pipeline immediately.

use std::sync::Arc;

use url::Url;

use crate::http::request::Request;
use crate::http::response::{Failure, HandlerResult, Reply};
use crate::routing::handler::{ErrorHandler, Handler};

/// Run normal handlers left to right.
pub async fn reduce(stages: Vec<Arc<dyn Handler>>, request: &Request, url: &Url) -> HandlerResult {
    let mut acc = Reply::Unset;
    for stage in stages {
        acc = stage.call(request.clone(), acc, url.clone()).await?;
    }
    Ok(acc)
}

/// Outcome of an error pipeline.
#[derive(Debug)]
pub enum Recovery {
    /// The handlers produced a usable reply.
    Resolved(Reply),
    /// Nothing usable came out; the original failure stands.
    Unresolved(Failure),
}

/// Run error handlers left to right against `failure`.
///
/// A handler that itself fails ends the pipeline; the original failure is
/// kept and the secondary one is only logged.
pub async fn reduce_errors(
    stages: Vec<Arc<dyn ErrorHandler>>,
    failure: Failure,
    request: &Request,
    url: &Url,
) -> Recovery {
    let mut acc = Reply::Unset;
    for stage in stages {
        let pending = stage.call(&failure, request.clone(), acc, url.clone());
        match pending.await {
            Ok(next) => acc = next,
            Err(secondary) => {
                tracing::warn!(
                    original = %failure,
                    error = %secondary,
                    path = url.path(),
                    "Error handler failed; keeping original failure"
                );
                return Recovery::Unresolved(failure);
            }
        }
    }

    if acc.is_unset() {
        Recovery::Unresolved(failure)
    } else {
        Recovery::Resolved(acc)
    }
}
