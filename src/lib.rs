//! Switchyard: request routing and middleware dispatch.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ net (listener) ─▶ http (canonical Request) ─▶ routing (Router)
//!                                                                      │
//!                                             matching normal rules ◀──┘
//!                                                    │ pipeline
//!                                   ok ◀─────────────┴──────────▶ raised
//!                                    │                              │
//!                                    │                 matching error rules
//!                                    │                              │ pipeline
//!                                    ▼                              ▼
//!     Client Response ◀──────── Reply → Response ◀──── resolved / guarded
//! ```
//!
//! Cross-cutting: `config` (TOML), `observability` (tracing, metrics),
//! `lifecycle` (shutdown signal), `well_known` (built-in endpoints).

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;
pub mod well_known;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServerConfig;
pub use http::{Failure, Reply, Request, Response, Server};
pub use lifecycle::Shutdown;
pub use net::{EmbeddedListener, ListenOptions, Listener, SocketListener};
pub use routing::{ErrorHandler, Handler, MethodFilter, PathFilter, Router, Routes, Verb};
