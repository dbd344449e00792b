//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (any time, usually at startup):
//!     registration.rs (shape → rule)
//!     → table.rs (append to normal or error list)
//!
//! Incoming Request (method, url)
//!     → router.rs (snapshot matching rules)
//!     → matcher.rs (evaluate method and path filters)
//!     → pipeline.rs (run handlers in registration order)
//!     → on failure: error rules → pipeline.rs again
//!     → Response
//! ```
//!
//! # Design Decisions
//! - Linear scan over rules; registration order is priority
//! - Every matching handler runs, not just the first
//! - Tables are append-only, so dispatch never takes a lock

pub mod handler;
pub mod matcher;
pub mod pipeline;
pub mod registration;
pub mod router;
pub mod table;

pub use handler::{ErrorHandler, Handler};
pub use matcher::{Matcher, MethodFilter, PathFilter};
pub use registration::{RegistrationError, RouteShape, Routes, Verb};
pub use router::Router;
