//! Per-gesture trigger thresholds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::Gesture;

/// Trigger threshold for each gesture, in [0, 1].
///
/// An intensity at or above the threshold counts as triggered (the boundary
/// is inclusive). Lower thresholds make a gesture fire on subtler movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub smile: f32,
    pub blink: f32,
    pub brow_down: f32,
    pub brow_up: f32,
    pub cheek_puff: f32,
    pub mouth_pucker: f32,
    pub jaw_open: f32,
    pub tongue_out: f32,
    pub squint: f32,
    pub jaw_move: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            smile: 0.4,
            blink: 0.7,
            brow_down: 0.2,
            brow_up: 0.6,
            cheek_puff: 0.2,
            mouth_pucker: 0.7,
            jaw_open: 0.6,
            tongue_out: 0.6,
            squint: 0.3,
            jaw_move: 0.3,
        }
    }
}

#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("{gesture} threshold {value} is out of range, must be within [0, 1]")]
    OutOfRange { gesture: Gesture, value: f32 },
}

impl Thresholds {
    /// Load thresholds from `GRIMACE_*_THRESHOLD` environment variables,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            smile: env_f32("GRIMACE_SMILE_THRESHOLD", defaults.smile),
            blink: env_f32("GRIMACE_BLINK_THRESHOLD", defaults.blink),
            brow_down: env_f32("GRIMACE_BROW_DOWN_THRESHOLD", defaults.brow_down),
            brow_up: env_f32("GRIMACE_BROW_UP_THRESHOLD", defaults.brow_up),
            cheek_puff: env_f32("GRIMACE_CHEEK_PUFF_THRESHOLD", defaults.cheek_puff),
            mouth_pucker: env_f32("GRIMACE_MOUTH_PUCKER_THRESHOLD", defaults.mouth_pucker),
            jaw_open: env_f32("GRIMACE_JAW_OPEN_THRESHOLD", defaults.jaw_open),
            tongue_out: env_f32("GRIMACE_TONGUE_OUT_THRESHOLD", defaults.tongue_out),
            squint: env_f32("GRIMACE_SQUINT_THRESHOLD", defaults.squint),
            jaw_move: env_f32("GRIMACE_JAW_MOVE_THRESHOLD", defaults.jaw_move),
        }
    }

    /// The threshold configured for `gesture`.
    pub fn get(&self, gesture: Gesture) -> f32 {
        match gesture {
            Gesture::BrowUp => self.brow_up,
            Gesture::CheekPuff => self.cheek_puff,
            Gesture::MouthPucker => self.mouth_pucker,
            Gesture::JawOpen => self.jaw_open,
            Gesture::TongueOut => self.tongue_out,
            Gesture::Smile => self.smile,
            Gesture::Blink => self.blink,
            Gesture::BrowDown => self.brow_down,
            Gesture::Squint => self.squint,
            Gesture::JawMove => self.jaw_move,
        }
    }

    /// Check that every threshold is within [0, 1]. NaN is rejected.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for gesture in Gesture::ALL {
            let value = self.get(gesture);
            if !(0.0..=1.0).contains(&value) {
                return Err(ThresholdError::OutOfRange { gesture, value });
            }
        }
        Ok(())
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_defaults() {
        let t = Thresholds::default();
        assert_eq!(t.smile, 0.4);
        assert_eq!(t.blink, 0.7);
        assert_eq!(t.brow_down, 0.2);
        assert_eq!(t.brow_up, 0.6);
        assert_eq!(t.cheek_puff, 0.2);
        assert_eq!(t.mouth_pucker, 0.7);
        assert_eq!(t.jaw_open, 0.6);
        assert_eq!(t.tongue_out, 0.6);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_get_covers_all_gestures() {
        let t = Thresholds::default();
        assert_eq!(t.get(Gesture::Smile), t.smile);
        assert_eq!(t.get(Gesture::JawMove), t.jaw_move);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let t = Thresholds { blink: 1.5, ..Thresholds::default() };
        match t.validate() {
            Err(ThresholdError::OutOfRange { gesture, value }) => {
                assert_eq!(gesture, Gesture::Blink);
                assert_eq!(value, 1.5);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }

        let t = Thresholds { squint: -0.1, ..Thresholds::default() };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let t = Thresholds { smile: f32::NAN, ..Thresholds::default() };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_boundaries_are_valid() {
        let t = Thresholds { smile: 0.0, blink: 1.0, ..Thresholds::default() };
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_profile_deserializes_with_defaults() {
        let t: Thresholds = serde_json::from_str(r#"{"smile": 0.9}"#).unwrap();
        assert_eq!(t.smile, 0.9);
        assert_eq!(t.blink, Thresholds::default().blink);
    }
}
