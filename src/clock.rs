//! Audio time to frame mapping
//!
//! Live playback derives the frame number from the audio position; offline
//! export walks frames `0..number_of_frames` at a fixed rate.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Maps audio playback time to frame numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    /// Seconds of audio before frame 0
    pub lead_in_seconds: f64,
    pub fps: f64,
}

impl PlaybackClock {
    pub fn new(settings: &Settings) -> Self {
        Self {
            lead_in_seconds: settings.lead_in_seconds(),
            fps: settings.fps,
        }
    }

    /// Frame to show at `audio_seconds` into the track. Negative during the
    /// lead-in; `None` if the time is not finite.
    pub fn frame_at(&self, audio_seconds: f64) -> Option<i64> {
        if !audio_seconds.is_finite() {
            return None;
        }
        Some(((audio_seconds - self.lead_in_seconds) * self.fps).floor() as i64)
    }

    /// Audio position at which `frame` starts
    pub fn seconds_at(&self, frame: i64) -> f64 {
        frame as f64 / self.fps + self.lead_in_seconds
    }
}

/// What an offline frame exporter needs to know
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub fps: u32,
    pub number_of_frames: u32,
}

impl ExportInfo {
    pub fn new(settings: &Settings) -> Self {
        Self {
            // Settings validation keeps fps whole
            fps: settings.fps.round() as u32,
            number_of_frames: settings.export_frames,
        }
    }

    /// Length of the export in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.number_of_frames as f64 / self.fps as f64
    }
}
