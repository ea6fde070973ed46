//! Host-facing observer hooks.
//!
//! Keep listeners one-way; they must not couple back into playback paths.

pub mod listeners;

pub use listeners::{RigContext, RigEvent, RigListener};
