//! Test utilities for hosts embedding the engine.

mod mocks;

pub use mocks::{NoOpExtension, RecordingExtension, RecordingHost};
