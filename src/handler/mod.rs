//! Request handling: routing, static file serving, directory listings.

pub mod listing;
pub mod router;
pub mod static_files;

pub use router::handle_request;
