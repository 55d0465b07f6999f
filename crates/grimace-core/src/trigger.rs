//! The trigger facade: owns the configured evaluator set and drives it once
//! per incoming frame.

use crate::blend::BlendShapeFrame;
use crate::evaluator::{Evaluator, Reading};
use crate::event::TriggerSink;
use crate::gesture::Gesture;
use crate::thresholds::{ThresholdError, Thresholds};

/// Converts per-frame blend-shape maps into gesture events.
///
/// Single-threaded and synchronous: callers must serialize `on_frame`
/// invocations. Within a tick, a tracking transition is delivered before any
/// gesture reading, and evaluators run in [`Gesture::ALL`] order; paired
/// readings carry combined, left, right in that order. Nothing is reordered
/// across ticks. Delivery context (e.g. hopping to a UI thread) is the
/// embedder's concern.
#[derive(Debug, Default)]
pub struct FaceTrigger {
    evaluators: Vec<(Gesture, Evaluator)>,
    tracked: bool,
}

impl FaceTrigger {
    /// An unconfigured trigger. Feed it frames only after
    /// [`configure`](Self::configure).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full evaluator set.
    ///
    /// Calling again replaces the set, clearing all edge state.
    pub fn configure(&mut self, thresholds: &Thresholds) -> Result<(), ThresholdError> {
        self.configure_gestures(thresholds, &Gesture::ALL)
    }

    /// Build evaluators for `gestures` only, e.g. omitting gestures whose
    /// blend shapes the frame source cannot report.
    ///
    /// Registration order stays canonical regardless of the slice order, and
    /// duplicates collapse. Calling again replaces the set.
    pub fn configure_gestures(
        &mut self,
        thresholds: &Thresholds,
        gestures: &[Gesture],
    ) -> Result<(), ThresholdError> {
        thresholds.validate()?;
        self.evaluators = Gesture::ALL
            .into_iter()
            .filter(|gesture| gestures.contains(gesture))
            .map(|gesture| (gesture, Evaluator::for_gesture(gesture, thresholds.get(gesture))))
            .collect();
        tracing::debug!(gestures = self.evaluators.len(), "configured evaluator set");
        Ok(())
    }

    /// Whether an evaluator set has been built.
    pub fn is_configured(&self) -> bool {
        !self.evaluators.is_empty()
    }

    /// The configured gestures, in evaluation order.
    pub fn gestures(&self) -> impl Iterator<Item = Gesture> + '_ {
        self.evaluators.iter().map(|(gesture, _)| *gesture)
    }

    /// Clear all evaluator edge state and mark the face untracked, as after
    /// a session restart. The configured set is kept.
    pub fn reset(&mut self) {
        self.tracked = false;
        for (_, evaluator) in &mut self.evaluators {
            evaluator.reset();
        }
    }

    /// Feed one frame.
    ///
    /// Emits a tracking event first if `tracked` flipped since the previous
    /// tick (the initial state is untracked), then one reading per configured
    /// gesture in registration order.
    pub fn on_frame(&mut self, frame: &BlendShapeFrame, tracked: bool, sink: &mut dyn TriggerSink) {
        if tracked != self.tracked {
            sink.on_tracking_changed(tracked);
        }
        self.tracked = tracked;

        for (gesture, evaluator) in &mut self.evaluators {
            dispatch(sink, *gesture, evaluator.tick(frame));
        }
    }
}

/// Route a reading to the sink method for its gesture.
fn dispatch(sink: &mut dyn TriggerSink, gesture: Gesture, reading: Reading) {
    match (gesture, reading) {
        (Gesture::BrowUp, Reading::Single(r)) => sink.on_brow_up(&r),
        (Gesture::CheekPuff, Reading::Single(r)) => sink.on_cheek_puff(&r),
        (Gesture::MouthPucker, Reading::Single(r)) => sink.on_mouth_pucker(&r),
        (Gesture::JawOpen, Reading::Single(r)) => sink.on_jaw_open(&r),
        (Gesture::TongueOut, Reading::Single(r)) => sink.on_tongue_out(&r),
        (Gesture::Smile, Reading::Paired(r)) => sink.on_smile(&r),
        (Gesture::Blink, Reading::Paired(r)) => sink.on_blink(&r),
        (Gesture::BrowDown, Reading::Paired(r)) => sink.on_brow_down(&r),
        (Gesture::Squint, Reading::Paired(r)) => sink.on_squint(&r),
        (Gesture::JawMove, Reading::Paired(r)) => sink.on_jaw_move(&r),
        // Kind mismatches cannot be built by Evaluator::for_gesture.
        _ => {}
    }
}
