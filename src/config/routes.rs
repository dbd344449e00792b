//! Static routes from configuration.
//!
//! Each `[[routes]]` entry becomes one rule answering with a fixed status.
//! Method tokens are upper-cased; standard verbs and custom tokens are both
//! accepted, since entries go through the general `route` registration.

use axum::http::StatusCode;
use regex::Regex;

use crate::config::schema::{RouteConfig, RouteKind};
use crate::http::response::Reply;
use crate::routing::handler::{sync, sync_error};
use crate::routing::{MethodFilter, PathFilter, RegistrationError, RouteShape, Routes, Verb};

/// Register every configured static route on `target`.
pub fn register_routes<R: Routes>(target: &R, routes: &[RouteConfig]) -> Result<(), RegistrationError> {
    for route in routes {
        register_route(target, route)?;
    }
    Ok(())
}

fn register_route<R: Routes>(target: &R, route: &RouteConfig) -> Result<(), RegistrationError> {
    let status = route
        .status
        .map(StatusCode::from_u16)
        .transpose()
        .map_err(|_| RegistrationError::InvalidCallSignature(format!("route '{}': invalid status", route.name)))?;

    let methods = method_filter(&route.methods);
    let path = match (&route.path, &route.pattern) {
        (Some(path), None) => Some(PathFilter::from(path.as_str())),
        (None, Some(pattern)) => Some(PathFilter::Pattern(Regex::new(pattern)?)),
        (None, None) => None,
        (Some(_), Some(_)) => {
            return Err(RegistrationError::InvalidCallSignature(format!(
                "route '{}': path and pattern are mutually exclusive",
                route.name
            )))
        }
    };

    tracing::debug!(
        route = %route.name,
        kind = ?route.kind,
        methods = ?route.methods,
        status = ?status,
        "Registering static route"
    );

    match route.kind {
        RouteKind::Request => {
            let handler = sync(move |_, _, _| Ok(fixed_reply(status)));
            target.register(RouteShape::resolve(methods, path, Some(handler))?);
        }
        RouteKind::Error => {
            let handler = sync_error(move |_, _, _, _| Ok(fixed_reply(status)));
            target.register_error(RouteShape::resolve(methods, path, Some(handler))?);
        }
    }
    Ok(())
}

fn fixed_reply(status: Option<StatusCode>) -> Reply {
    status.map_or(Reply::NoContent, Reply::Status)
}

fn method_filter(methods: &[String]) -> Option<MethodFilter> {
    let tokens: Vec<String> = methods
        .iter()
        .map(|m| match m.parse::<Verb>() {
            Ok(verb) => verb.as_str().to_owned(),
            Err(_) => m.to_ascii_uppercase(),
        })
        .collect();

    match tokens.len() {
        0 => None,
        1 => tokens.into_iter().next().map(MethodFilter::from),
        _ => Some(MethodFilter::from(tokens)),
    }
}
