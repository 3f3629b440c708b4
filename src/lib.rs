//! Insertion Sort MV - frame timelines for an audio-synced insertion sort video
//!
//! Core modules:
//! - `sim`: Deterministic timeline builders (box sort, group sort, camera path)
//! - `scene`: Frame sampler that applies timelines to scene handles
//! - `clock`: Audio time / export frame mapping
//! - `settings`: Authored constants, loadable from JSON
//! - `error`: Configuration errors raised at construction time

pub mod clock;
pub mod error;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, ConfigResult};
pub use scene::{CameraHandle, FrameSample, Highlight, RowHandle, Scene};
pub use settings::Settings;

/// Timeline configuration constants
pub mod consts {
    /// Default RNG seed for the box shuffles
    pub const DEFAULT_SEED: &str = "insertion sort";

    /// Song tempo (beats per minute)
    pub const DEFAULT_BPM: f64 = 108.0;
    /// Output frame rate
    pub const DEFAULT_FPS: f64 = 60.0;

    /// Box easing denominator (each sub-frame covers 1/32 of the remaining distance)
    pub const BOX_EASING: f64 = 32.0;
    /// Group easing denominator (groups move further, less often)
    pub const GROUP_EASING: f64 = 16.0;
    /// Sub-frames recorded after every box swap
    pub const SETTLE_STEPS_PER_SWAP: usize = 28;
    /// Summed per-step movement below which a timeline is at rest
    pub const SETTLE_THRESHOLD: f64 = 0.0001;
    /// Upper bound on post-sort settle sub-frames
    pub const MAX_SETTLE_STEPS: usize = 100_000;

    /// Reads per beat in the group sort (one read per quarter beat)
    pub const READS_PER_BEAT: f64 = 4.0;

    /// World-space distance between neighbouring boxes and rows
    pub const GRID_SPACING: f64 = 1.41;
}

/// Clamp a (possibly negative) frame number into `[0, len - 1]`
#[inline]
pub fn clamp_frame(frame: i64, len: usize) -> usize {
    let last = len.saturating_sub(1);
    if frame <= 0 {
        0
    } else {
        (frame as u64).min(last as u64) as usize
    }
}

/// Number of whole frames needed to cover `beats` at the given tempo
#[inline]
pub fn beats_to_frames(beats: f64, bpm: f64, fps: f64) -> f64 {
    beats * 60.0 / bpm * fps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_frame_edges() {
        assert_eq!(clamp_frame(-5, 10), 0);
        assert_eq!(clamp_frame(0, 10), 0);
        assert_eq!(clamp_frame(4, 10), 4);
        assert_eq!(clamp_frame(9, 10), 9);
        assert_eq!(clamp_frame(10, 10), 9);
        assert_eq!(clamp_frame(i64::MAX, 10), 9);
        assert_eq!(clamp_frame(3, 0), 0);
    }

    #[test]
    fn test_beats_to_frames() {
        // One beat at 108 BPM / 60 fps is 33.33 frames
        assert!((beats_to_frames(1.0, 108.0, 60.0) - 100.0 / 3.0).abs() < 1e-9);
        assert!((beats_to_frames(3.0, 108.0, 60.0) - 100.0).abs() < 1e-9);
    }
}
