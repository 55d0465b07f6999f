//! JSON Lines recordings of blend-shape sessions.
//!
//! One frame per line:
//!
//! ```text
//! {"time": 1.234, "tracked": true, "shapes": {"mouthSmileLeft": 0.62}}
//! ```
//!
//! Shape keys use the platform's camelCase identifiers. Names this build
//! does not know are skipped with a warning so recordings from newer
//! trackers stay loadable; a line that is not valid JSON is an error.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use grimace_core::{BlendShape, BlendShapeFrame};

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed frame at line {line}: {source}")]
    Malformed {
        line: usize,
        source: serde_json::Error,
    },
}

/// Wire form of one frame line.
#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    time: f64,
    #[serde(default)]
    tracked: bool,
    #[serde(default)]
    shapes: HashMap<String, f32>,
}

/// One tick of a recorded session.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    /// Seconds since the start of the session.
    pub time: f64,
    /// Whether the tracking system had a face lock for this frame.
    pub tracked: bool,
    pub shapes: BlendShapeFrame,
}

/// A full recorded session, in capture order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Load a recording from a JSONL file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let path = path.as_ref();
        let recording = Self::from_reader(BufReader::new(File::open(path)?))?;
        tracing::info!(
            path = %path.display(),
            frames = recording.frames.len(),
            shapes = recording.shapes_present().len(),
            "loaded recording"
        );
        Ok(recording)
    }

    /// Parse a recording from a buffered reader. Blank lines are skipped.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, RecordingError> {
        let mut frames = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawFrame = serde_json::from_str(&line)
                .map_err(|source| RecordingError::Malformed { line: idx + 1, source })?;

            let mut shapes = BlendShapeFrame::new();
            for (name, intensity) in raw.shapes {
                match name.parse::<BlendShape>() {
                    Ok(shape) => shapes.set(shape, intensity),
                    Err(_) => {
                        tracing::warn!(line = idx + 1, shape = %name, "skipping unknown blend shape")
                    }
                }
            }

            frames.push(RecordedFrame {
                time: raw.time,
                tracked: raw.tracked,
                shapes,
            });
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Session length in seconds: the last frame's timestamp.
    pub fn duration(&self) -> f64 {
        self.frames.last().map(|frame| frame.time).unwrap_or(0.0)
    }

    /// Every blend shape that appears in at least one frame.
    ///
    /// This is the capability surface of a recording: gestures whose shapes
    /// never appear can be omitted at configure time, mirroring a tracker
    /// that lacks the capability.
    pub fn shapes_present(&self) -> BTreeSet<BlendShape> {
        self.frames
            .iter()
            .flat_map(|frame| frame.shapes.iter().map(|(shape, _)| shape))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_session() {
        let jsonl = r#"{"time": 0.0, "tracked": false, "shapes": {}}
{"time": 0.033, "tracked": true, "shapes": {"mouthSmileLeft": 0.62, "mouthSmileRight": 0.58}}
{"time": 0.066, "tracked": true, "shapes": {"jawOpen": 0.9}}
"#;
        let recording = Recording::from_reader(jsonl.as_bytes()).unwrap();
        assert_eq!(recording.len(), 3);
        assert!(!recording.frames[0].tracked);
        assert!(recording.frames[1].tracked);
        assert_eq!(
            recording.frames[1].shapes.intensity(BlendShape::MouthSmileLeft),
            0.62
        );
        assert_eq!(recording.frames[2].shapes.intensity(BlendShape::JawOpen), 0.9);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let jsonl = "\n{\"time\": 0.1, \"tracked\": true, \"shapes\": {}}\n\n";
        let recording = Recording::from_reader(jsonl.as_bytes()).unwrap();
        assert_eq!(recording.len(), 1);
    }

    #[test]
    fn test_missing_fields_default() {
        let recording = Recording::from_reader("{}".as_bytes()).unwrap();
        let frame = &recording.frames[0];
        assert_eq!(frame.time, 0.0);
        assert!(!frame.tracked);
        assert!(frame.shapes.is_empty());
    }

    #[test]
    fn test_unknown_shape_is_skipped_not_fatal() {
        let jsonl = r#"{"time": 0.0, "tracked": true, "shapes": {"mouthSmirk": 0.5, "cheekPuff": 0.3}}"#;
        let recording = Recording::from_reader(jsonl.as_bytes()).unwrap();
        let frame = &recording.frames[0];
        assert_eq!(frame.shapes.len(), 1);
        assert_eq!(frame.shapes.intensity(BlendShape::CheekPuff), 0.3);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let jsonl = "{\"time\": 0.0}\nnot json\n";
        match Recording::from_reader(jsonl.as_bytes()) {
            Err(RecordingError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_duration_and_empty() {
        let recording = Recording::default();
        assert!(recording.is_empty());
        assert_eq!(recording.duration(), 0.0);

        let jsonl = "{\"time\": 0.5}\n{\"time\": 2.25}\n";
        let recording = Recording::from_reader(jsonl.as_bytes()).unwrap();
        assert_eq!(recording.duration(), 2.25);
    }

    #[test]
    fn test_shapes_present_unions_all_frames() {
        let jsonl = r#"{"shapes": {"eyeBlinkLeft": 0.1}}
{"shapes": {"eyeBlinkRight": 0.2, "eyeBlinkLeft": 0.0}}
"#;
        let recording = Recording::from_reader(jsonl.as_bytes()).unwrap();
        let present = recording.shapes_present();
        assert_eq!(present.len(), 2);
        assert!(present.contains(&BlendShape::EyeBlinkLeft));
        assert!(present.contains(&BlendShape::EyeBlinkRight));
    }
}
