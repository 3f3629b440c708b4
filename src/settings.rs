//! Scene settings
//!
//! Every number the video is authored with lives here: seed, tempo, grid size,
//! the row notes and the camera script. Settings serialize to JSON so a scene
//! can be tweaked without recompiling.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::beats_to_frames;
use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};
use crate::sim::{CameraCue, CameraSegment, ReadPacing, authored_script};

/// Row notes of the song, one row per note
pub const DEFAULT_NOTES: [i32; 17] = [-8, 16, 0, 9, -1, 4, 5, -3, 8, 14, 20, 21, 19, 17, 12, 2, 11];

/// Boxes per row
pub const DEFAULT_COLUMNS: usize = 16;

/// Beats of music before the group sort starts
pub const DEFAULT_GROUP_START_BEATS: f64 = 10.0;

/// Beats of audio before frame 0 during live playback
pub const DEFAULT_LEAD_IN_BEATS: f64 = 2.5;

/// Frames rendered by an offline export (40 seconds)
pub const DEFAULT_EXPORT_FRAMES: u32 = 40 * 60;

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for the box shuffles
    pub seed: String,

    // === Timing ===
    /// Song tempo (beats per minute)
    pub bpm: f64,
    /// Output frame rate
    pub fps: f64,
    /// Beats before the group sort starts
    pub group_start_beats: f64,
    /// Beats of audio before frame 0 in live playback
    pub lead_in_beats: f64,
    /// Frames rendered by an offline export
    pub export_frames: u32,

    // === Grid ===
    /// Boxes per row
    pub columns: usize,
    /// One note per row; drives row height and the group sort
    pub notes: Vec<i32>,

    // === Camera ===
    /// Camera script timed in beats, so it follows `bpm`
    pub camera: Vec<CameraCue>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_owned(),

            bpm: DEFAULT_BPM,
            fps: DEFAULT_FPS,
            group_start_beats: DEFAULT_GROUP_START_BEATS,
            lead_in_beats: DEFAULT_LEAD_IN_BEATS,
            export_frames: DEFAULT_EXPORT_FRAMES,

            columns: DEFAULT_COLUMNS,
            notes: DEFAULT_NOTES.to_vec(),

            camera: authored_script(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take their defaults) and validate
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject authoring mistakes before any timeline is built
    pub fn validate(&self) -> ConfigResult<()> {
        ReadPacing::from_tempo(self.bpm, self.fps)?;
        if !self.group_start_beats.is_finite() || self.group_start_beats < 0.0 {
            return Err(ConfigError::timing(format!(
                "group start must be a non-negative beat count, got {}",
                self.group_start_beats
            )));
        }
        if !self.lead_in_beats.is_finite() || self.lead_in_beats < 0.0 {
            return Err(ConfigError::timing(format!(
                "lead-in must be a non-negative beat count, got {}",
                self.lead_in_beats
            )));
        }
        if self.export_frames == 0 {
            return Err(ConfigError::settings("export_frames must be at least 1"));
        }
        if self.columns == 0 {
            return Err(ConfigError::NoBoxes);
        }
        if self.notes.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        if self.camera.is_empty() {
            return Err(ConfigError::NoSegments);
        }
        if self.fps.fract() != 0.0 {
            return Err(ConfigError::timing(format!(
                "fps must be a whole number, got {}",
                self.fps
            )));
        }
        Ok(())
    }

    /// Read pacing of the group sort
    pub fn read_pacing(&self) -> ConfigResult<ReadPacing> {
        ReadPacing::from_tempo(self.bpm, self.fps)
    }

    /// Camera script converted to frames at the current tempo
    pub fn camera_segments(&self) -> Vec<CameraSegment> {
        self.camera
            .iter()
            .map(|cue| cue.to_segment(self.bpm, self.fps))
            .collect()
    }

    /// Frame at which the group sort timeline starts
    pub fn group_start_frame(&self) -> i64 {
        beats_to_frames(self.group_start_beats, self.bpm, self.fps).floor() as i64
    }

    /// Seconds of audio before frame 0
    pub fn lead_in_seconds(&self) -> f64 {
        self.lead_in_beats * 60.0 / self.bpm
    }
}
