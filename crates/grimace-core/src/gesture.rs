//! Gesture vocabulary and the static gesture-to-blend-shape descriptor table.
//!
//! Each gesture is a configuration record: which shape(s) it reads and how.
//! There is no per-gesture behavior beyond this table; the two evaluator
//! state machines in [`crate::evaluator`] cover every entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::blend::BlendShape;

/// A discrete facial gesture derived from one or two blend-shape coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gesture {
    BrowUp,
    CheekPuff,
    MouthPucker,
    JawOpen,
    TongueOut,
    Smile,
    Blink,
    BrowDown,
    Squint,
    JawMove,
}

/// Which blend shape(s) back a gesture, using the platform's identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// One shape crossed against one threshold.
    Single(BlendShape),
    /// A mirrored left/right pair sharing one threshold, with a derived
    /// combined state.
    Paired { left: BlendShape, right: BlendShape },
}

impl Gesture {
    /// All gestures, in registration order. Evaluation always follows this
    /// order so event streams are deterministic.
    pub const ALL: [Gesture; 10] = [
        Gesture::BrowUp,
        Gesture::CheekPuff,
        Gesture::MouthPucker,
        Gesture::JawOpen,
        Gesture::TongueOut,
        Gesture::Smile,
        Gesture::Blink,
        Gesture::BrowDown,
        Gesture::Squint,
        Gesture::JawMove,
    ];

    /// The descriptor for this gesture: its shape(s) and evaluator category.
    pub fn kind(self) -> GestureKind {
        match self {
            Gesture::BrowUp => GestureKind::Single(BlendShape::BrowInnerUp),
            Gesture::CheekPuff => GestureKind::Single(BlendShape::CheekPuff),
            Gesture::MouthPucker => GestureKind::Single(BlendShape::MouthPucker),
            Gesture::JawOpen => GestureKind::Single(BlendShape::JawOpen),
            Gesture::TongueOut => GestureKind::Single(BlendShape::TongueOut),
            Gesture::Smile => GestureKind::Paired {
                left: BlendShape::MouthSmileLeft,
                right: BlendShape::MouthSmileRight,
            },
            Gesture::Blink => GestureKind::Paired {
                left: BlendShape::EyeBlinkLeft,
                right: BlendShape::EyeBlinkRight,
            },
            Gesture::BrowDown => GestureKind::Paired {
                left: BlendShape::BrowDownLeft,
                right: BlendShape::BrowDownRight,
            },
            Gesture::Squint => GestureKind::Paired {
                left: BlendShape::EyeSquintLeft,
                right: BlendShape::EyeSquintRight,
            },
            Gesture::JawMove => GestureKind::Paired {
                left: BlendShape::JawLeft,
                right: BlendShape::JawRight,
            },
        }
    }

    /// The blend shapes this gesture reads.
    pub fn shapes(self) -> &'static [BlendShape] {
        match self {
            Gesture::BrowUp => &[BlendShape::BrowInnerUp],
            Gesture::CheekPuff => &[BlendShape::CheekPuff],
            Gesture::MouthPucker => &[BlendShape::MouthPucker],
            Gesture::JawOpen => &[BlendShape::JawOpen],
            Gesture::TongueOut => &[BlendShape::TongueOut],
            Gesture::Smile => &[BlendShape::MouthSmileLeft, BlendShape::MouthSmileRight],
            Gesture::Blink => &[BlendShape::EyeBlinkLeft, BlendShape::EyeBlinkRight],
            Gesture::BrowDown => &[BlendShape::BrowDownLeft, BlendShape::BrowDownRight],
            Gesture::Squint => &[BlendShape::EyeSquintLeft, BlendShape::EyeSquintRight],
            Gesture::JawMove => &[BlendShape::JawLeft, BlendShape::JawRight],
        }
    }

    /// True iff every shape this gesture reads is in `supported`.
    ///
    /// A gesture whose shapes a source cannot report would only ever read
    /// 0.0 and never trigger; callers use this to omit such gestures at
    /// configure time instead.
    pub fn is_available(self, supported: &BTreeSet<BlendShape>) -> bool {
        self.shapes().iter().all(|shape| supported.contains(shape))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gesture::BrowUp => "brow-up",
            Gesture::CheekPuff => "cheek-puff",
            Gesture::MouthPucker => "mouth-pucker",
            Gesture::JawOpen => "jaw-open",
            Gesture::TongueOut => "tongue-out",
            Gesture::Smile => "smile",
            Gesture::Blink => "blink",
            Gesture::BrowDown => "brow-down",
            Gesture::Squint => "squint",
            Gesture::JawMove => "jaw-move",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown gesture name: {name}")]
pub struct ParseGestureError {
    pub name: String,
}

impl FromStr for Gesture {
    type Err = ParseGestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gesture::ALL
            .iter()
            .copied()
            .find(|gesture| gesture.as_str() == s)
            .ok_or_else(|| ParseGestureError { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for gesture in Gesture::ALL {
            assert_eq!(gesture.as_str().parse::<Gesture>().unwrap(), gesture);
        }
    }

    #[test]
    fn test_kind_matches_shapes() {
        for gesture in Gesture::ALL {
            match gesture.kind() {
                GestureKind::Single(shape) => assert_eq!(gesture.shapes(), &[shape]),
                GestureKind::Paired { left, right } => {
                    assert_eq!(gesture.shapes(), &[left, right])
                }
            }
        }
    }

    #[test]
    fn test_availability() {
        let supported: BTreeSet<BlendShape> =
            [BlendShape::MouthSmileLeft, BlendShape::MouthSmileRight, BlendShape::JawOpen]
                .into_iter()
                .collect();

        assert!(Gesture::Smile.is_available(&supported));
        assert!(Gesture::JawOpen.is_available(&supported));
        // Blink needs both eyeBlink shapes, neither present.
        assert!(!Gesture::Blink.is_available(&supported));
        assert!(!Gesture::TongueOut.is_available(&supported));
    }

    #[test]
    fn test_availability_needs_both_sides() {
        let supported: BTreeSet<BlendShape> =
            [BlendShape::EyeBlinkLeft].into_iter().collect();
        assert!(!Gesture::Blink.is_available(&supported));
    }
}
