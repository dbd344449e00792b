//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every ShutdownSignal resolves
//!     → listeners stop accepting → in-flight requests finish
//! ```
//!
//! # Design Decisions
//! - Shutdown stops accepting; it never cancels a running dispatch
//! - A coordinator dropped without triggering never fires

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
