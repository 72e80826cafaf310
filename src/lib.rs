//! A tiny static file server for local use: serve a directory over HTTP
//! and open a browser tab pointing at it.
//!
//! The binary wires these modules together; they are exposed as a library
//! so a whole server can be constructed and exercised in tests without
//! touching process-global state.

pub mod browser;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
