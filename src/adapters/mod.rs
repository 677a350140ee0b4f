//! Implementations of the port traits.
//!
//! `live` talks to the real world, `recording` wraps live adapters and
//! captures a cassette, `replaying` serves a cassette back.

pub mod live;
pub mod recording;
pub mod replaying;
