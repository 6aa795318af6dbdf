//! Channel naming
//!
//! The log format carries no channel names. This module holds the optional
//! overlay that maps channel slots to names supplied by the caller.

pub mod channel_map;

pub use channel_map::{ChannelInfo, ChannelMap};
