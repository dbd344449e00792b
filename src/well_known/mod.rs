//! Built-in `/.well-known/` endpoints.

pub mod time;

pub use time::register_time;
