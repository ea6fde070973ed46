//! tensile-rig: material-testing machine simulator core.
//!
//! Replays a recorded stress-strain curve scaled to a specimen, paces sample
//! emission in real time, fires one-shot instrument/limit events and keeps a
//! deformation animation in lockstep with the simulated progress.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod scene;
pub mod telemetry;

pub use api::{RigConfig, TestRig};
pub use error::{RigError, RigResult};
