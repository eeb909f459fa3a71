//! Lyric sidecar toolkit - shared modules for both binaries.

pub mod migrate;
pub mod models;
pub mod progress;
pub mod timecode;
pub mod ttml;
