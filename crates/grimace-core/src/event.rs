//! Event model: per-tick gesture readings and the consumer sink trait.

use serde::Serialize;

use crate::blend::BlendShape;

/// One side of a gesture for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SideReading {
    /// True iff `triggered` differs from the previous tick for this side.
    pub changed: bool,
    /// Whether the intensity is at or above the configured threshold.
    pub triggered: bool,
    /// The raw coefficient value that produced this reading.
    pub intensity: f32,
}

/// Per-tick reading from a single-shape gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SingleReading {
    /// The blend shape that produced this reading.
    pub shape: BlendShape,
    pub changed: bool,
    pub triggered: bool,
    pub intensity: f32,
}

/// Per-tick reading from a mirrored left/right gesture pair.
///
/// `combined` triggers only while both sides are triggered at once; its
/// intensity is the mean of the two sides. Sides are reported from the
/// subject's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairedReading {
    /// Primary (platform-left) blend shape of the pair.
    pub shape: BlendShape,
    pub combined: SideReading,
    pub left: SideReading,
    pub right: SideReading,
}

/// Consumer of trigger events. Every method has a default no-op body, so
/// implementors pick only the gestures they care about.
///
/// Gesture methods fire once per tick for every configured gesture, whether
/// or not anything changed; filter on `changed` to react to edges only.
/// Delivery is synchronous and ordered: a tracking transition precedes any
/// gesture reading within the same tick.
pub trait TriggerSink {
    /// Face tracking acquired or lost. Fires only on transitions.
    fn on_tracking_changed(&mut self, _tracked: bool) {}

    fn on_brow_up(&mut self, _reading: &SingleReading) {}
    fn on_cheek_puff(&mut self, _reading: &SingleReading) {}
    fn on_mouth_pucker(&mut self, _reading: &SingleReading) {}
    fn on_jaw_open(&mut self, _reading: &SingleReading) {}
    fn on_tongue_out(&mut self, _reading: &SingleReading) {}

    fn on_smile(&mut self, _reading: &PairedReading) {}
    fn on_blink(&mut self, _reading: &PairedReading) {}
    fn on_brow_down(&mut self, _reading: &PairedReading) {}
    fn on_squint(&mut self, _reading: &PairedReading) {}
    fn on_jaw_move(&mut self, _reading: &PairedReading) {}
}
