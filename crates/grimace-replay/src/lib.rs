//! grimace-replay — recorded blend-shape sessions as a frame source.
//!
//! Stands in for the live tracking system: a recording replays the same
//! per-tick `{shapes, tracked}` feed the platform session would deliver.

pub mod recording;

pub use recording::{RecordedFrame, Recording, RecordingError};
