//! Threshold/edge-detection state machines.
//!
//! Two evaluator categories cover every gesture: one shape against one
//! threshold, or a mirrored left/right pair with a derived combined state.
//! Each holds only the previous tick's triggered booleans; callers drive
//! `tick` once per frame, serially.

use crate::blend::{BlendShape, BlendShapeFrame};
use crate::event::{PairedReading, SideReading, SingleReading};
use crate::gesture::{Gesture, GestureKind};

/// Edge detector for one blend shape against one threshold.
#[derive(Debug, Clone)]
pub struct SingleEvaluator {
    shape: BlendShape,
    threshold: f32,
    was_triggered: bool,
}

impl SingleEvaluator {
    pub fn new(shape: BlendShape, threshold: f32) -> Self {
        Self {
            shape,
            threshold,
            was_triggered: false,
        }
    }

    /// Evaluate one frame.
    ///
    /// Emits a reading every tick; `changed` marks edges against the previous
    /// tick (implicitly untriggered on the first tick). A shape absent from
    /// the frame reads as intensity 0.0.
    pub fn tick(&mut self, frame: &BlendShapeFrame) -> SingleReading {
        let intensity = frame.intensity(self.shape);
        let triggered = intensity >= self.threshold;
        let reading = SingleReading {
            shape: self.shape,
            changed: triggered != self.was_triggered,
            triggered,
            intensity,
        };
        self.was_triggered = triggered;
        reading
    }

    /// Forget the previous tick's state.
    pub fn reset(&mut self) {
        self.was_triggered = false;
    }
}

/// Edge detector for a left/right blend-shape pair sharing one threshold.
#[derive(Debug, Clone)]
pub struct PairedEvaluator {
    platform_left: BlendShape,
    platform_right: BlendShape,
    threshold: f32,
    was_left: bool,
    was_right: bool,
    was_combined: bool,
}

impl PairedEvaluator {
    pub fn new(platform_left: BlendShape, platform_right: BlendShape, threshold: f32) -> Self {
        Self {
            platform_left,
            platform_right,
            threshold,
            was_left: false,
            was_right: false,
            was_combined: false,
        }
    }

    /// Evaluate one frame, producing combined, left, and right sides.
    ///
    /// The platform's "left"/"right" shape identifiers are mirrored relative
    /// to the subject, so the pair is swapped on read: the subject-left side
    /// reads the platform-right identifier and vice versa. Combined triggers
    /// only while both sides are triggered; its intensity is the mean of the
    /// two sides.
    pub fn tick(&mut self, frame: &BlendShapeFrame) -> PairedReading {
        let left_intensity = frame.intensity(self.platform_right);
        let right_intensity = frame.intensity(self.platform_left);

        let left = left_intensity >= self.threshold;
        let right = right_intensity >= self.threshold;
        let combined = left && right;

        let reading = PairedReading {
            shape: self.platform_left,
            combined: SideReading {
                changed: combined != self.was_combined,
                triggered: combined,
                intensity: (left_intensity + right_intensity) / 2.0,
            },
            left: SideReading {
                changed: left != self.was_left,
                triggered: left,
                intensity: left_intensity,
            },
            right: SideReading {
                changed: right != self.was_right,
                triggered: right,
                intensity: right_intensity,
            },
        };

        self.was_left = left;
        self.was_right = right;
        self.was_combined = combined;
        reading
    }

    /// Forget the previous tick's state for all three sides.
    pub fn reset(&mut self) {
        self.was_left = false;
        self.was_right = false;
        self.was_combined = false;
    }
}

/// A configured evaluator for one gesture.
#[derive(Debug, Clone)]
pub enum Evaluator {
    Single(SingleEvaluator),
    Paired(PairedEvaluator),
}

/// The reading an evaluator produced for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Single(SingleReading),
    Paired(PairedReading),
}

impl Evaluator {
    /// Build the evaluator for `gesture` from its descriptor.
    pub fn for_gesture(gesture: Gesture, threshold: f32) -> Self {
        match gesture.kind() {
            GestureKind::Single(shape) => {
                Evaluator::Single(SingleEvaluator::new(shape, threshold))
            }
            GestureKind::Paired { left, right } => {
                Evaluator::Paired(PairedEvaluator::new(left, right, threshold))
            }
        }
    }

    pub fn tick(&mut self, frame: &BlendShapeFrame) -> Reading {
        match self {
            Evaluator::Single(e) => Reading::Single(e.tick(frame)),
            Evaluator::Paired(e) => Reading::Paired(e.tick(frame)),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Evaluator::Single(e) => e.reset(),
            Evaluator::Paired(e) => e.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(pairs: &[(BlendShape, f32)]) -> BlendShapeFrame {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_single_edge_sequence() {
        // threshold 0.5, intensities [0.2, 0.6, 0.6, 0.3]
        // => triggered [F, T, T, F], changed [F, T, F, T]
        let mut eval = SingleEvaluator::new(BlendShape::JawOpen, 0.5);
        let expected = [
            (0.2, false, false),
            (0.6, true, true),
            (0.6, true, false),
            (0.3, false, true),
        ];
        for (intensity, triggered, changed) in expected {
            let r = eval.tick(&frame(&[(BlendShape::JawOpen, intensity)]));
            assert_eq!(r.triggered, triggered, "intensity {intensity}");
            assert_eq!(r.changed, changed, "intensity {intensity}");
            assert_eq!(r.intensity, intensity);
            assert_eq!(r.shape, BlendShape::JawOpen);
        }
    }

    #[test]
    fn test_single_threshold_boundary_is_inclusive() {
        let mut eval = SingleEvaluator::new(BlendShape::CheekPuff, 0.5);
        let r = eval.tick(&frame(&[(BlendShape::CheekPuff, 0.5)]));
        assert!(r.triggered);
    }

    #[test]
    fn test_single_zero_threshold_always_triggers() {
        let mut eval = SingleEvaluator::new(BlendShape::BrowInnerUp, 0.0);
        // Even an absent shape reads 0.0, which is >= 0.0.
        let r = eval.tick(&BlendShapeFrame::new());
        assert!(r.triggered);
        assert!(r.changed, "first tick crosses from the implicit false");
        let r = eval.tick(&frame(&[(BlendShape::BrowInnerUp, 0.7)]));
        assert!(r.triggered);
        assert!(!r.changed);
    }

    #[test]
    fn test_single_missing_shape_reads_zero() {
        let mut eval = SingleEvaluator::new(BlendShape::TongueOut, 0.6);
        let r = eval.tick(&frame(&[(BlendShape::JawOpen, 1.0)]));
        assert_eq!(r.intensity, 0.0);
        assert!(!r.triggered);
        assert!(!r.changed);
    }

    #[test]
    fn test_single_emits_every_tick() {
        // Steady state still yields a reading each tick, with changed=false.
        let mut eval = SingleEvaluator::new(BlendShape::MouthPucker, 0.7);
        for _ in 0..3 {
            let r = eval.tick(&frame(&[(BlendShape::MouthPucker, 0.9)]));
            assert!(r.triggered);
        }
        let r = eval.tick(&frame(&[(BlendShape::MouthPucker, 0.9)]));
        assert!(!r.changed);
    }

    #[test]
    fn test_single_reset_clears_edge_state() {
        let mut eval = SingleEvaluator::new(BlendShape::JawOpen, 0.5);
        eval.tick(&frame(&[(BlendShape::JawOpen, 0.9)]));
        eval.reset();
        let r = eval.tick(&frame(&[(BlendShape::JawOpen, 0.9)]));
        assert!(r.changed, "post-reset tick measures against implicit false");
    }

    #[test]
    fn test_paired_mirror_swap() {
        // Feeding only the platform-left identifier must surface as the
        // subject's RIGHT side.
        let mut eval =
            PairedEvaluator::new(BlendShape::EyeBlinkLeft, BlendShape::EyeBlinkRight, 0.5);
        let r = eval.tick(&frame(&[(BlendShape::EyeBlinkLeft, 0.9)]));
        assert!(r.right.triggered);
        assert!(r.right.changed);
        assert_eq!(r.right.intensity, 0.9);
        assert!(!r.left.triggered);
        assert_eq!(r.left.intensity, 0.0);
        assert!(!r.combined.triggered);

        // And the platform-right identifier surfaces as subject-left.
        let mut eval =
            PairedEvaluator::new(BlendShape::EyeBlinkLeft, BlendShape::EyeBlinkRight, 0.5);
        let r = eval.tick(&frame(&[(BlendShape::EyeBlinkRight, 0.9)]));
        assert!(r.left.triggered);
        assert!(!r.right.triggered);
    }

    #[test]
    fn test_paired_combined_requires_both_sides() {
        // threshold 0.5, left intensities [0.6, 0.6], right [0.3, 0.6]
        // (subject sides; remember the platform identifiers are swapped)
        let mut eval =
            PairedEvaluator::new(BlendShape::MouthSmileLeft, BlendShape::MouthSmileRight, 0.5);

        // tick 1: left=T right=F combined=F
        let r = eval.tick(&frame(&[
            (BlendShape::MouthSmileRight, 0.6), // subject left
            (BlendShape::MouthSmileLeft, 0.3),  // subject right
        ]));
        assert!(r.left.triggered);
        assert!(!r.right.triggered);
        assert!(!r.combined.triggered);
        assert!(!r.combined.changed);
        assert_eq!(r.combined.intensity, (0.6 + 0.3) / 2.0);

        // tick 2: both sides cross; combined rises in the same tick.
        let r = eval.tick(&frame(&[
            (BlendShape::MouthSmileRight, 0.6),
            (BlendShape::MouthSmileLeft, 0.6),
        ]));
        assert!(r.left.triggered);
        assert!(!r.left.changed);
        assert!(r.right.triggered);
        assert!(r.right.changed);
        assert!(r.combined.triggered);
        assert!(r.combined.changed);
    }

    #[test]
    fn test_paired_combined_never_lags_a_side() {
        let mut eval =
            PairedEvaluator::new(BlendShape::BrowDownLeft, BlendShape::BrowDownRight, 0.2);
        let both = frame(&[
            (BlendShape::BrowDownLeft, 0.8),
            (BlendShape::BrowDownRight, 0.8),
        ]);
        let r = eval.tick(&both);
        assert_eq!(r.combined.triggered, r.left.triggered && r.right.triggered);

        // One side drops; combined drops the same tick.
        let r = eval.tick(&frame(&[(BlendShape::BrowDownLeft, 0.8)]));
        assert!(!r.combined.triggered);
        assert!(r.combined.changed);
        assert_eq!(r.combined.triggered, r.left.triggered && r.right.triggered);
    }

    #[test]
    fn test_paired_primary_shape_is_platform_left() {
        let mut eval = PairedEvaluator::new(BlendShape::JawLeft, BlendShape::JawRight, 0.3);
        let r = eval.tick(&BlendShapeFrame::new());
        assert_eq!(r.shape, BlendShape::JawLeft);
    }

    #[test]
    fn test_for_gesture_picks_category() {
        assert!(matches!(
            Evaluator::for_gesture(Gesture::JawOpen, 0.6),
            Evaluator::Single(_)
        ));
        assert!(matches!(
            Evaluator::for_gesture(Gesture::Blink, 0.7),
            Evaluator::Paired(_)
        ));
    }
}
