//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (exact, case-sensitive)
//! - Match request path (exact literal or regex)
//! - Combine conditions with AND semantics (see `table::Rule`)
//!
//! # Design Decisions
//! - Empty condition = always matches (wildcard)
//! - Literal paths match the whole path, never a prefix
//! - Patterns are unanchored unless the pattern anchors itself
//! - No parameter extraction

use std::borrow::Cow;
use std::fmt;

use axum::http::Method;
use regex::Regex;

use crate::routing::registration::Verb;

/// Trait for matching a request's method and path against a condition.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the condition holds for this method and path.
    fn matches(&self, method: &Method, path: &str) -> bool;
}

/// Method condition of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MethodFilter {
    /// Any method.
    #[default]
    Any,
    /// Exactly this method token.
    One(Cow<'static, str>),
    /// Any of these method tokens.
    Set(Vec<Cow<'static, str>>),
}

impl MethodFilter {
    /// Filter for a single, possibly non-standard, method token.
    pub fn token(token: impl Into<Cow<'static, str>>) -> Self {
        MethodFilter::One(token.into())
    }
}

impl Matcher for MethodFilter {
    fn matches(&self, method: &Method, _path: &str) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::One(token) => token == method.as_str(),
            MethodFilter::Set(tokens) => tokens.iter().any(|t| t == method.as_str()),
        }
    }
}

impl From<Verb> for MethodFilter {
    fn from(verb: Verb) -> Self {
        MethodFilter::One(Cow::Borrowed(verb.as_str()))
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        MethodFilter::One(Cow::Owned(method.as_str().to_owned()))
    }
}

impl From<&'static str> for MethodFilter {
    fn from(token: &'static str) -> Self {
        MethodFilter::One(Cow::Borrowed(token))
    }
}

impl From<String> for MethodFilter {
    fn from(token: String) -> Self {
        MethodFilter::One(Cow::Owned(token))
    }
}

impl<const N: usize> From<[&'static str; N]> for MethodFilter {
    fn from(tokens: [&'static str; N]) -> Self {
        MethodFilter::Set(tokens.into_iter().map(Cow::Borrowed).collect())
    }
}

impl<const N: usize> From<[Verb; N]> for MethodFilter {
    fn from(verbs: [Verb; N]) -> Self {
        MethodFilter::Set(verbs.into_iter().map(|v| Cow::Borrowed(v.as_str())).collect())
    }
}

impl From<Vec<String>> for MethodFilter {
    fn from(tokens: Vec<String>) -> Self {
        MethodFilter::Set(tokens.into_iter().map(Cow::Owned).collect())
    }
}

/// Path condition of a rule.
#[derive(Debug, Clone, Default)]
pub enum PathFilter {
    /// Any path.
    #[default]
    Any,
    /// Exactly this path.
    Exact(String),
    /// Paths the pattern finds a match in.
    Pattern(Regex),
}

impl Matcher for PathFilter {
    fn matches(&self, _method: &Method, path: &str) -> bool {
        match self {
            PathFilter::Any => true,
            PathFilter::Exact(expected) => expected == path,
            PathFilter::Pattern(pattern) => pattern.is_match(path),
        }
    }
}

impl From<&str> for PathFilter {
    fn from(path: &str) -> Self {
        PathFilter::Exact(path.to_owned())
    }
}

impl From<String> for PathFilter {
    fn from(path: String) -> Self {
        PathFilter::Exact(path)
    }
}

impl From<Regex> for PathFilter {
    fn from(pattern: Regex) -> Self {
        PathFilter::Pattern(pattern)
    }
}
