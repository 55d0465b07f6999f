use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use grimace_core::{
    BlendShape, FaceTrigger, Gesture, GestureKind, PairedReading, SideReading, SingleReading,
    Thresholds, TriggerSink,
};
use grimace_replay::Recording;

#[derive(Parser)]
#[command(name = "grimace", about = "Replay blend-shape recordings as gesture events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recording through the trigger and print gesture events
    Replay {
        /// JSONL recording file
        recording: PathBuf,
        /// TOML threshold profile (default: GRIMACE_* environment variables)
        #[arg(long)]
        thresholds: Option<PathBuf>,
        /// Only evaluate these gestures (comma-separated, e.g. "smile,blink")
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
        /// Print every reading, not just changes
        #[arg(long)]
        all: bool,
        /// Emit one JSON object per event instead of text
        #[arg(long)]
        json: bool,
    },
    /// List supported gestures, their blend shapes, and default thresholds
    Gestures,
    /// Summarize a recording: frames, duration, shapes, exercisable gestures
    Inspect {
        /// JSONL recording file
        recording: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { recording, thresholds, only, all, json } => {
            replay(&recording, thresholds.as_deref(), &only, all, json)
        }
        Commands::Gestures => {
            gestures();
            Ok(())
        }
        Commands::Inspect { recording } => inspect(&recording),
    }
}

fn replay(
    path: &std::path::Path,
    profile: Option<&std::path::Path>,
    only: &[String],
    all: bool,
    json: bool,
) -> Result<()> {
    let recording = Recording::load(path)?;
    if recording.is_empty() {
        bail!("recording {} has no frames", path.display());
    }

    let thresholds = match profile {
        Some(file) => {
            let text = fs::read_to_string(file)
                .with_context(|| format!("failed to read threshold profile {}", file.display()))?;
            toml::from_str::<Thresholds>(&text)
                .with_context(|| format!("invalid threshold profile {}", file.display()))?
        }
        None => Thresholds::from_env(),
    };

    let gestures = selected_gestures(only, &recording.shapes_present())?;
    if gestures.is_empty() {
        bail!("recording {} exercises no supported gestures", path.display());
    }

    let mut trigger = FaceTrigger::new();
    trigger.configure_gestures(&thresholds, &gestures)?;

    let mut printer = Printer { time: 0.0, changes_only: !all, json };
    for frame in &recording.frames {
        printer.time = frame.time;
        trigger.on_frame(&frame.shapes, frame.tracked, &mut printer);
    }
    Ok(())
}

/// Gestures to evaluate: the explicit `--only` list, or every gesture the
/// recording can exercise.
fn selected_gestures(only: &[String], present: &BTreeSet<BlendShape>) -> Result<Vec<Gesture>> {
    if !only.is_empty() {
        return only
            .iter()
            .map(|name| name.parse::<Gesture>().map_err(Into::into))
            .collect();
    }

    let mut gestures = Vec::new();
    for gesture in Gesture::ALL {
        if gesture.is_available(present) {
            gestures.push(gesture);
        } else {
            tracing::debug!(%gesture, "omitting gesture, blend shapes absent from recording");
        }
    }
    Ok(gestures)
}

fn gestures() {
    let defaults = Thresholds::default();
    println!("{:<13} {:<7} {:>9}  shapes", "gesture", "kind", "threshold");
    for gesture in Gesture::ALL {
        let kind = match gesture.kind() {
            GestureKind::Single(_) => "single",
            GestureKind::Paired { .. } => "paired",
        };
        let shapes: Vec<&str> = gesture.shapes().iter().map(|shape| shape.as_str()).collect();
        println!(
            "{:<13} {:<7} {:>9.2}  {}",
            gesture,
            kind,
            defaults.get(gesture),
            shapes.join(", ")
        );
    }
}

fn inspect(path: &std::path::Path) -> Result<()> {
    let recording = Recording::load(path)?;
    let present = recording.shapes_present();
    let tracked = recording.frames.iter().filter(|frame| frame.tracked).count();
    let available: Vec<&str> = Gesture::ALL
        .into_iter()
        .filter(|gesture| gesture.is_available(&present))
        .map(|gesture| gesture.as_str())
        .collect();
    let shapes: Vec<&str> = present.iter().map(|shape| shape.as_str()).collect();

    println!("frames:    {}", recording.len());
    println!("duration:  {:.3}s", recording.duration());
    println!("tracked:   {tracked} of {} frames", recording.len());
    println!("shapes:    {}", shapes.join(", "));
    println!("gestures:  {}", available.join(", "));
    Ok(())
}

/// Prints the event stream as text lines or JSON objects.
///
/// By default only changes are printed; the trigger itself reports every
/// reading every tick and leaves filtering to the consumer.
struct Printer {
    time: f64,
    changes_only: bool,
    json: bool,
}

impl Printer {
    fn single(&self, gesture: Gesture, r: &SingleReading) {
        if self.changes_only && !r.changed {
            return;
        }
        if self.json {
            println!(
                "{}",
                serde_json::json!({
                    "time": self.time,
                    "event": "gesture",
                    "gesture": gesture.as_str(),
                    "side": "single",
                    "changed": r.changed,
                    "triggered": r.triggered,
                    "intensity": r.intensity,
                    "shape": r.shape.as_str(),
                })
            );
        } else {
            println!(
                "[{:8.3}] {:<13} single    triggered={:<5} intensity={:.3}",
                self.time, gesture, r.triggered, r.intensity
            );
        }
    }

    fn side(&self, gesture: Gesture, side: &str, shape: Option<BlendShape>, s: &SideReading) {
        if self.changes_only && !s.changed {
            return;
        }
        if self.json {
            let mut event = serde_json::json!({
                "time": self.time,
                "event": "gesture",
                "gesture": gesture.as_str(),
                "side": side,
                "changed": s.changed,
                "triggered": s.triggered,
                "intensity": s.intensity,
            });
            if let Some(shape) = shape {
                event["shape"] = serde_json::Value::String(shape.as_str().to_string());
            }
            println!("{event}");
        } else {
            println!(
                "[{:8.3}] {:<13} {:<9} triggered={:<5} intensity={:.3}",
                self.time, gesture, side, s.triggered, s.intensity
            );
        }
    }

    fn paired(&self, gesture: Gesture, r: &PairedReading) {
        self.side(gesture, "combined", Some(r.shape), &r.combined);
        self.side(gesture, "left", None, &r.left);
        self.side(gesture, "right", None, &r.right);
    }
}

impl TriggerSink for Printer {
    fn on_tracking_changed(&mut self, tracked: bool) {
        if self.json {
            println!(
                "{}",
                serde_json::json!({
                    "time": self.time,
                    "event": "tracking",
                    "tracked": tracked,
                })
            );
        } else {
            println!(
                "[{:8.3}] tracking      {}",
                self.time,
                if tracked { "acquired" } else { "lost" }
            );
        }
    }

    fn on_brow_up(&mut self, r: &SingleReading) {
        self.single(Gesture::BrowUp, r);
    }
    fn on_cheek_puff(&mut self, r: &SingleReading) {
        self.single(Gesture::CheekPuff, r);
    }
    fn on_mouth_pucker(&mut self, r: &SingleReading) {
        self.single(Gesture::MouthPucker, r);
    }
    fn on_jaw_open(&mut self, r: &SingleReading) {
        self.single(Gesture::JawOpen, r);
    }
    fn on_tongue_out(&mut self, r: &SingleReading) {
        self.single(Gesture::TongueOut, r);
    }

    fn on_smile(&mut self, r: &PairedReading) {
        self.paired(Gesture::Smile, r);
    }
    fn on_blink(&mut self, r: &PairedReading) {
        self.paired(Gesture::Blink, r);
    }
    fn on_brow_down(&mut self, r: &PairedReading) {
        self.paired(Gesture::BrowDown, r);
    }
    fn on_squint(&mut self, r: &PairedReading) {
        self.paired(Gesture::Squint, r);
    }
    fn on_jaw_move(&mut self, r: &PairedReading) {
        self.paired(Gesture::JawMove, r);
    }
}
