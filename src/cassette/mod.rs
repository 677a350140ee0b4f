//! Cassette format for recording and replaying port interactions.
//!
//! A cassette captures every LLM completion and git query made during one
//! run so that the same analysis can be replayed offline and byte-for-byte.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{Cassette, Interaction, Port};
pub use recorder::CassetteRecorder;
pub use replayer::CassetteReplayer;
