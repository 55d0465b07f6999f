//! Blend-shape vocabulary and the per-tick intensity map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named facial coefficient reported by the tracking system, one per
/// muscle deformation, with intensity in [0, 1].
///
/// Wire names are the platform's camelCase identifiers (`mouthSmileLeft`,
/// `browInnerUp`, ...). "Left" and "right" here are the platform's labels,
/// which are mirrored relative to the subject; the evaluators account for
/// the swap when reporting sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendShape {
    EyeBlinkLeft,
    EyeLookDownLeft,
    EyeLookInLeft,
    EyeLookOutLeft,
    EyeLookUpLeft,
    EyeSquintLeft,
    EyeWideLeft,
    EyeBlinkRight,
    EyeLookDownRight,
    EyeLookInRight,
    EyeLookOutRight,
    EyeLookUpRight,
    EyeSquintRight,
    EyeWideRight,
    JawForward,
    JawLeft,
    JawRight,
    JawOpen,
    MouthClose,
    MouthFunnel,
    MouthPucker,
    MouthLeft,
    MouthRight,
    MouthSmileLeft,
    MouthSmileRight,
    MouthFrownLeft,
    MouthFrownRight,
    MouthDimpleLeft,
    MouthDimpleRight,
    MouthStretchLeft,
    MouthStretchRight,
    MouthRollLower,
    MouthRollUpper,
    MouthShrugLower,
    MouthShrugUpper,
    MouthPressLeft,
    MouthPressRight,
    MouthLowerDownLeft,
    MouthLowerDownRight,
    MouthUpperUpLeft,
    MouthUpperUpRight,
    BrowDownLeft,
    BrowDownRight,
    BrowInnerUp,
    BrowOuterUpLeft,
    BrowOuterUpRight,
    CheekPuff,
    CheekSquintLeft,
    CheekSquintRight,
    NoseSneerLeft,
    NoseSneerRight,
    TongueOut,
}

impl BlendShape {
    /// Every known blend shape.
    pub const ALL: [BlendShape; 52] = [
        BlendShape::EyeBlinkLeft,
        BlendShape::EyeLookDownLeft,
        BlendShape::EyeLookInLeft,
        BlendShape::EyeLookOutLeft,
        BlendShape::EyeLookUpLeft,
        BlendShape::EyeSquintLeft,
        BlendShape::EyeWideLeft,
        BlendShape::EyeBlinkRight,
        BlendShape::EyeLookDownRight,
        BlendShape::EyeLookInRight,
        BlendShape::EyeLookOutRight,
        BlendShape::EyeLookUpRight,
        BlendShape::EyeSquintRight,
        BlendShape::EyeWideRight,
        BlendShape::JawForward,
        BlendShape::JawLeft,
        BlendShape::JawRight,
        BlendShape::JawOpen,
        BlendShape::MouthClose,
        BlendShape::MouthFunnel,
        BlendShape::MouthPucker,
        BlendShape::MouthLeft,
        BlendShape::MouthRight,
        BlendShape::MouthSmileLeft,
        BlendShape::MouthSmileRight,
        BlendShape::MouthFrownLeft,
        BlendShape::MouthFrownRight,
        BlendShape::MouthDimpleLeft,
        BlendShape::MouthDimpleRight,
        BlendShape::MouthStretchLeft,
        BlendShape::MouthStretchRight,
        BlendShape::MouthRollLower,
        BlendShape::MouthRollUpper,
        BlendShape::MouthShrugLower,
        BlendShape::MouthShrugUpper,
        BlendShape::MouthPressLeft,
        BlendShape::MouthPressRight,
        BlendShape::MouthLowerDownLeft,
        BlendShape::MouthLowerDownRight,
        BlendShape::MouthUpperUpLeft,
        BlendShape::MouthUpperUpRight,
        BlendShape::BrowDownLeft,
        BlendShape::BrowDownRight,
        BlendShape::BrowInnerUp,
        BlendShape::BrowOuterUpLeft,
        BlendShape::BrowOuterUpRight,
        BlendShape::CheekPuff,
        BlendShape::CheekSquintLeft,
        BlendShape::CheekSquintRight,
        BlendShape::NoseSneerLeft,
        BlendShape::NoseSneerRight,
        BlendShape::TongueOut,
    ];

    /// The platform's camelCase identifier for this shape.
    pub fn as_str(self) -> &'static str {
        match self {
            BlendShape::EyeBlinkLeft => "eyeBlinkLeft",
            BlendShape::EyeLookDownLeft => "eyeLookDownLeft",
            BlendShape::EyeLookInLeft => "eyeLookInLeft",
            BlendShape::EyeLookOutLeft => "eyeLookOutLeft",
            BlendShape::EyeLookUpLeft => "eyeLookUpLeft",
            BlendShape::EyeSquintLeft => "eyeSquintLeft",
            BlendShape::EyeWideLeft => "eyeWideLeft",
            BlendShape::EyeBlinkRight => "eyeBlinkRight",
            BlendShape::EyeLookDownRight => "eyeLookDownRight",
            BlendShape::EyeLookInRight => "eyeLookInRight",
            BlendShape::EyeLookOutRight => "eyeLookOutRight",
            BlendShape::EyeLookUpRight => "eyeLookUpRight",
            BlendShape::EyeSquintRight => "eyeSquintRight",
            BlendShape::EyeWideRight => "eyeWideRight",
            BlendShape::JawForward => "jawForward",
            BlendShape::JawLeft => "jawLeft",
            BlendShape::JawRight => "jawRight",
            BlendShape::JawOpen => "jawOpen",
            BlendShape::MouthClose => "mouthClose",
            BlendShape::MouthFunnel => "mouthFunnel",
            BlendShape::MouthPucker => "mouthPucker",
            BlendShape::MouthLeft => "mouthLeft",
            BlendShape::MouthRight => "mouthRight",
            BlendShape::MouthSmileLeft => "mouthSmileLeft",
            BlendShape::MouthSmileRight => "mouthSmileRight",
            BlendShape::MouthFrownLeft => "mouthFrownLeft",
            BlendShape::MouthFrownRight => "mouthFrownRight",
            BlendShape::MouthDimpleLeft => "mouthDimpleLeft",
            BlendShape::MouthDimpleRight => "mouthDimpleRight",
            BlendShape::MouthStretchLeft => "mouthStretchLeft",
            BlendShape::MouthStretchRight => "mouthStretchRight",
            BlendShape::MouthRollLower => "mouthRollLower",
            BlendShape::MouthRollUpper => "mouthRollUpper",
            BlendShape::MouthShrugLower => "mouthShrugLower",
            BlendShape::MouthShrugUpper => "mouthShrugUpper",
            BlendShape::MouthPressLeft => "mouthPressLeft",
            BlendShape::MouthPressRight => "mouthPressRight",
            BlendShape::MouthLowerDownLeft => "mouthLowerDownLeft",
            BlendShape::MouthLowerDownRight => "mouthLowerDownRight",
            BlendShape::MouthUpperUpLeft => "mouthUpperUpLeft",
            BlendShape::MouthUpperUpRight => "mouthUpperUpRight",
            BlendShape::BrowDownLeft => "browDownLeft",
            BlendShape::BrowDownRight => "browDownRight",
            BlendShape::BrowInnerUp => "browInnerUp",
            BlendShape::BrowOuterUpLeft => "browOuterUpLeft",
            BlendShape::BrowOuterUpRight => "browOuterUpRight",
            BlendShape::CheekPuff => "cheekPuff",
            BlendShape::CheekSquintLeft => "cheekSquintLeft",
            BlendShape::CheekSquintRight => "cheekSquintRight",
            BlendShape::NoseSneerLeft => "noseSneerLeft",
            BlendShape::NoseSneerRight => "noseSneerRight",
            BlendShape::TongueOut => "tongueOut",
        }
    }
}

impl fmt::Display for BlendShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown blend shape name: {name}")]
pub struct ParseBlendShapeError {
    pub name: String,
}

impl FromStr for BlendShape {
    type Err = ParseBlendShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlendShape::ALL
            .iter()
            .copied()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| ParseBlendShapeError { name: s.to_string() })
    }
}

/// Sparse blend-shape intensities for one tick.
///
/// Shapes absent from the map read as intensity 0.0; a missing coefficient
/// is never an error. Intensities are stored as-is, without clamping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlendShapeFrame {
    shapes: HashMap<BlendShape, f32>,
}

impl BlendShapeFrame {
    /// An empty frame; every shape reads as 0.0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an intensity for one shape, replacing any prior value.
    pub fn set(&mut self, shape: BlendShape, intensity: f32) {
        self.shapes.insert(shape, intensity);
    }

    /// Intensity for `shape`, or 0.0 if the frame does not contain it.
    pub fn intensity(&self, shape: BlendShape) -> f32 {
        self.shapes.get(&shape).copied().unwrap_or(0.0)
    }

    /// Whether the frame carries a value for `shape`.
    pub fn contains(&self, shape: BlendShape) -> bool {
        self.shapes.contains_key(&shape)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterate the shapes present in this frame, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (BlendShape, f32)> + '_ {
        self.shapes.iter().map(|(shape, intensity)| (*shape, *intensity))
    }
}

impl FromIterator<(BlendShape, f32)> for BlendShapeFrame {
    fn from_iter<I: IntoIterator<Item = (BlendShape, f32)>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}
