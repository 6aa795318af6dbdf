//! Expanded (DL) log format handling
//!
//! Detection reads the header and picks a layout variant; layout resolution
//! then locates the data region for that variant. Both are pure functions of
//! the buffer bytes.

pub mod header;
pub mod layout_constants;

pub(crate) mod detect;
pub(crate) mod layout;

pub use detect::Classification;
pub use header::{HeaderField, HeaderFields};
