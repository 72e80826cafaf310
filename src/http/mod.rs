//! HTTP protocol helpers, independent of any particular handler.

pub mod conditional;
pub mod mime;
pub mod percent;
pub mod range;
pub mod response;

pub use range::{ByteRange, RangeOutcome};
pub use response::SERVER_NAME;
