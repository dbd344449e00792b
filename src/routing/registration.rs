//! Fluent registration surface.
//!
//! # Responsibilities
//! - Map the three registration shapes onto `(method, path, handler)` rules
//! - Provide per-verb shortcuts for the closed set of method tokens
//! - Reject malformed registrations immediately
//!
//! # Design Decisions
//! - Every registration returns `&Self` so calls chain
//! - Verb shortcuts are generated from a fixed table, not looked up at runtime
//! - Non-standard verbs go through `route` with an explicit `MethodFilter`

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::routing::handler::{ErrorHandler, Handler};
use crate::routing::matcher::{MethodFilter, PathFilter};
use crate::routing::router::Router;
use crate::routing::table::Rule;

/// Errors raised at registration time.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The given combination of arguments is not a valid registration.
    #[error("invalid call signature: {0}")]
    InvalidCallSignature(String),

    /// A verb shortcut was requested for an unknown method.
    #[error("invalid HTTP verb '{0}'; for custom verbs, use `route` instead")]
    InvalidMethod(String),

    /// A path pattern failed to compile.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

macro_rules! verbs {
    ($($variant:ident => $token:literal),* $(,)?) => {
        /// Method tokens that have registration shortcuts.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Verb {
            $($variant,)*
        }

        impl Verb {
            pub const ALL: &'static [Verb] = &[$(Verb::$variant,)*];

            /// Uppercase method token.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Verb::$variant => $token,)*
                }
            }
        }

        impl FromStr for Verb {
            type Err = RegistrationError;

            /// Case-insensitive lookup.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.to_ascii_uppercase();
                match upper.as_str() {
                    $($token => Ok(Verb::$variant),)*
                    _ => Err(RegistrationError::InvalidMethod(upper)),
                }
            }
        }
    };
}

verbs! {
    Get => "GET",
    Put => "PUT",
    Post => "POST",
    Delete => "DELETE",
    Head => "HEAD",
    Options => "OPTIONS",
    Patch => "PATCH",
    Propfind => "PROPFIND",
    Proppatch => "PROPPATCH",
    Mkcol => "MKCOL",
    Copy => "COPY",
    Move => "MOVE",
    Lock => "LOCK",
    Search => "SEARCH",
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The accepted registration shapes.
#[derive(Debug, Clone)]
pub enum RouteShape<H> {
    /// Handler only: any method, any path.
    Handler(H),
    /// Path and handler: any method.
    PathHandler(PathFilter, H),
    /// Method filter, path filter and handler.
    Full(MethodFilter, PathFilter, H),
}

impl<H> RouteShape<H> {
    /// Resolve optional arguments into a shape.
    ///
    /// A method filter without a path means "any path"; a missing handler is
    /// an invalid call signature.
    pub fn resolve(
        methods: Option<MethodFilter>,
        path: Option<PathFilter>,
        handler: Option<H>,
    ) -> Result<Self, RegistrationError> {
        let handler = handler.ok_or_else(|| {
            RegistrationError::InvalidCallSignature("a handler is required".to_owned())
        })?;

        Ok(match (methods, path) {
            (Some(methods), path) => RouteShape::Full(methods, path.unwrap_or_default(), handler),
            (None, Some(path)) => RouteShape::PathHandler(path, handler),
            (None, None) => RouteShape::Handler(handler),
        })
    }

    /// The `(method-filter, path-filter, handler)` triple this shape stands for.
    pub fn into_parts(self) -> (MethodFilter, PathFilter, H) {
        match self {
            RouteShape::Handler(h) => (MethodFilter::Any, PathFilter::Any, h),
            RouteShape::PathHandler(path, h) => (MethodFilter::Any, path, h),
            RouteShape::Full(methods, path, h) => (methods, path, h),
        }
    }
}

macro_rules! verb_shortcuts {
    ($($name:ident, $error_name:ident => $variant:ident;)*) => {
        $(
            #[doc = concat!("Register a handler for `", stringify!($variant), "` requests.")]
            fn $name<H: Handler>(&self, path: impl Into<PathFilter>, handler: H) -> &Self {
                self.on(Verb::$variant, path, handler)
            }

            #[doc = concat!("Register an error handler for `", stringify!($variant), "` requests.")]
            fn $error_name<H: ErrorHandler>(&self, path: impl Into<PathFilter>, handler: H) -> &Self {
                self.on_error(Verb::$variant, path, handler)
            }
        )*
    };
}

/// Registration operations shared by routers and servers.
pub trait Routes {
    /// Router receiving the registrations.
    fn router(&self) -> &Router;

    /// Register a normal handler in any shape.
    fn register<H: Handler>(&self, shape: RouteShape<H>) -> &Self {
        let (methods, path, handler) = shape.into_parts();
        let handler: Arc<dyn Handler> = Arc::new(handler);
        self.router().push_request(Rule::new(methods, path, handler));
        self
    }

    /// Register an error handler in any shape.
    fn register_error<H: ErrorHandler>(&self, shape: RouteShape<H>) -> &Self {
        let (methods, path, handler) = shape.into_parts();
        let handler: Arc<dyn ErrorHandler> = Arc::new(handler);
        self.router().push_error(Rule::new(methods, path, handler));
        self
    }

    /// Register with full control over method and path filters.
    fn route<H: Handler>(
        &self,
        methods: impl Into<MethodFilter>,
        path: impl Into<PathFilter>,
        handler: H,
    ) -> &Self {
        self.register(RouteShape::Full(methods.into(), path.into(), handler))
    }

    /// Error-handler counterpart of [`Routes::route`].
    fn route_error<H: ErrorHandler>(
        &self,
        methods: impl Into<MethodFilter>,
        path: impl Into<PathFilter>,
        handler: H,
    ) -> &Self {
        self.register_error(RouteShape::Full(methods.into(), path.into(), handler))
    }

    /// Register for every method.
    fn use_middleware<H: Handler>(&self, path: impl Into<PathFilter>, handler: H) -> &Self {
        self.register(RouteShape::PathHandler(path.into(), handler))
    }

    /// Register an error handler for every method.
    fn use_error<H: ErrorHandler>(&self, path: impl Into<PathFilter>, handler: H) -> &Self {
        self.register_error(RouteShape::PathHandler(path.into(), handler))
    }

    fn on<H: Handler>(&self, verb: Verb, path: impl Into<PathFilter>, handler: H) -> &Self {
        self.route(verb, path, handler)
    }

    fn on_error<H: ErrorHandler>(&self, verb: Verb, path: impl Into<PathFilter>, handler: H) -> &Self {
        self.route_error(verb, path, handler)
    }

    /// Register by verb name, e.g. `"propfind"`.
    fn verb<H: Handler>(
        &self,
        name: &str,
        path: impl Into<PathFilter>,
        handler: H,
    ) -> Result<&Self, RegistrationError> {
        let verb = name.parse::<Verb>()?;
        Ok(self.on(verb, path, handler))
    }

    /// Register an error handler by verb name.
    fn verb_error<H: ErrorHandler>(
        &self,
        name: &str,
        path: impl Into<PathFilter>,
        handler: H,
    ) -> Result<&Self, RegistrationError> {
        let verb = name.parse::<Verb>()?;
        Ok(self.on_error(verb, path, handler))
    }

    verb_shortcuts! {
        get, get_error => Get;
        put, put_error => Put;
        post, post_error => Post;
        delete, delete_error => Delete;
        head, head_error => Head;
        options, options_error => Options;
        patch, patch_error => Patch;
        propfind, propfind_error => Propfind;
        proppatch, proppatch_error => Proppatch;
        mkcol, mkcol_error => Mkcol;
        copy, copy_error => Copy;
        move_, move_error => Move;
        lock, lock_error => Lock;
        search, search_error => Search;
    }
}
