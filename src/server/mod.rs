//! TCP serving: listener setup, the accept loop, shutdown coordination.

pub mod conn;
pub mod listener;
pub mod shutdown;

// `loop` is a keyword, so the file loop.rs is mounted under another name
#[path = "loop.rs"]
pub mod serve_loop;

pub use listener::bind_listener;
pub use serve_loop::run;
pub use shutdown::{spawn_signal_listener, ShutdownSignal};
