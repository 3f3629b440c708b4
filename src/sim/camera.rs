//! Scripted camera flight
//!
//! The camera path is a list of authored segments. Within a segment the
//! position and look-at target ease exponentially toward the segment's end
//! pose: each frame covers `1/damp` of the remaining distance, so the end pose
//! is approached but (for `damp > 1`) never quite reached. Segments do not
//! blend; each starts from its own authored start pose.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::handle::CameraHandle;
use super::timeline::{Timeline, TimelineBuilder};
use crate::beats_to_frames;
use crate::error::{ConfigError, ConfigResult};

/// Start and end pose of a camera move, independent of its duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraShot {
    /// Camera position at the start of the shot
    pub start: Vec3,
    /// Look-at target at the start of the shot
    pub look_at: Vec3,
    /// Position to ease toward (holds `start` when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Vec3>,
    /// Look-at target to ease toward (holds `look_at` when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_at_end: Option<Vec3>,
    /// Easing denominator; 1 snaps to the end pose on the first frame
    pub damp: f32,
}

impl CameraShot {
    /// A static shot
    pub fn hold(start: Vec3, look_at: Vec3, damp: f32) -> Self {
        Self {
            start,
            look_at,
            end: None,
            look_at_end: None,
            damp,
        }
    }

    /// Ease the position toward `end`
    pub fn moving_to(mut self, end: Vec3) -> Self {
        self.end = Some(end);
        self
    }

    /// Ease the look-at target toward `look_at_end`
    pub fn looking_to(mut self, look_at_end: Vec3) -> Self {
        self.look_at_end = Some(look_at_end);
        self
    }

    pub fn for_frames(self, frames: usize) -> CameraSegment {
        CameraSegment { frames, shot: self }
    }

    pub fn for_beats(self, beats: f64) -> CameraCue {
        CameraCue { beats, shot: self }
    }
}

/// A shot lasting a number of beats; converted to frames once the tempo is known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraCue {
    pub beats: f64,
    #[serde(flatten)]
    pub shot: CameraShot,
}

impl CameraCue {
    pub fn to_segment(&self, bpm: f64, fps: f64) -> CameraSegment {
        self.shot
            .clone()
            .for_frames(CameraSegment::frames_for_beats(self.beats, bpm, fps))
    }
}

/// One stretch of the camera path, in frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSegment {
    /// Number of frames this segment produces
    pub frames: usize,
    #[serde(flatten)]
    pub shot: CameraShot,
}

impl CameraSegment {
    /// Frames needed to cover `beats` of music, rounded up
    pub fn frames_for_beats(beats: f64, bpm: f64, fps: f64) -> usize {
        // Absorb float noise so 3 beats at 108 BPM is exactly 100 frames
        (beats_to_frames(beats, bpm, fps) - 1e-9).ceil().max(0.0) as usize
    }

    fn validate(&self, index: usize) -> ConfigResult<()> {
        if self.frames == 0 {
            return Err(ConfigError::EmptySegment { index });
        }
        if !self.shot.damp.is_finite() || self.shot.damp < 1.0 {
            return Err(ConfigError::InvalidDamping {
                index,
                damp: self.shot.damp,
            });
        }
        Ok(())
    }
}

/// Camera pose for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraFrame {
    pub fn apply<C: CameraHandle>(&self, camera: &mut C) {
        camera.set_position(self.position);
        camera.look_at(self.look_at);
    }
}

/// Precomputed camera path
#[derive(Debug, Clone)]
pub struct CameraAnimation {
    frames: Timeline<CameraFrame>,
    segment_starts: Vec<usize>,
}

impl CameraAnimation {
    pub fn new(segments: &[CameraSegment]) -> ConfigResult<Self> {
        if segments.is_empty() {
            return Err(ConfigError::NoSegments);
        }
        for (index, segment) in segments.iter().enumerate() {
            segment.validate(index)?;
        }

        let mut frames = TimelineBuilder::new();
        let mut segment_starts = Vec::with_capacity(segments.len());
        for segment in segments {
            segment_starts.push(frames.len());

            let shot = &segment.shot;
            let end = shot.end.unwrap_or(shot.start);
            let look_at_end = shot.look_at_end.unwrap_or(shot.look_at);
            let mut current = shot.start;
            let mut look_at = shot.look_at;
            for _ in 0..segment.frames {
                current += (end - current) / shot.damp;
                look_at += (look_at_end - look_at) / shot.damp;
                frames.push(CameraFrame {
                    position: current,
                    look_at,
                });
            }
        }

        let frames = frames.finish().ok_or(ConfigError::NoSegments)?;
        log::debug!(
            "Built camera animation: {} segments, {} frames",
            segments.len(),
            frames.len()
        );

        Ok(Self {
            frames,
            segment_starts,
        })
    }

    /// Camera pose at `frame`, clamped to the path
    pub fn frame(&self, frame: i64) -> &CameraFrame {
        self.frames.at(frame)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// First frame index of each segment
    pub fn segment_starts(&self) -> &[usize] {
        &self.segment_starts
    }

    pub fn apply_to_camera<C: CameraHandle>(&self, frame: i64, camera: &mut C) {
        self.frames.at(frame).apply(camera);
    }
}

/// The music video's camera script, timed in beats
pub fn authored_script() -> Vec<CameraCue> {
    let tr = Vec3::new(2.0, 0.0, 2.0);

    vec![
        // Intro: rise up and back over the grid
        CameraShot::hold(Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 3.0, -12.0), 64.0)
            .moving_to(Vec3::new(0.0, 12.0, 24.0))
            .for_beats(2.5),
        CameraShot::hold(Vec3::new(-16.0, 10.0, 8.0), Vec3::new(0.0, 5.0, 0.0), 64.0)
            .moving_to(Vec3::new(-16.0, 10.0, -8.0))
            .for_beats(2.5),
        CameraShot::hold(Vec3::new(-9.0, 16.0, -16.0), Vec3::new(-2.0, 7.0, 0.0), 64.0)
            .moving_to(Vec3::new(22.0, 7.0, 0.0))
            .for_beats(17.0),
        // Group sort
        CameraShot::hold(Vec3::new(17.0, 6.0, 16.0), Vec3::new(-16.0, 7.0, -8.0), 256.0)
            .moving_to(Vec3::new(20.0, 8.0, 10.0))
            .for_beats(12.0),
        CameraShot::hold(Vec3::new(18.0, 16.0, -16.0), Vec3::ZERO, 256.0)
            .moving_to(Vec3::new(22.0, 8.0, 10.0))
            .looking_to(Vec3::new(0.0, 9.0, 0.0))
            .for_beats(12.0),
        CameraShot::hold(Vec3::new(25.0, 8.0, 0.0), Vec3::new(0.0, 7.0, 0.0), 128.0)
            .moving_to(Vec3::new(18.0, 7.0, 0.0))
            .looking_to(Vec3::new(0.0, 8.0, 0.0))
            .for_beats(3.0),
        CameraShot::hold(
            Vec3::new(16.0, 5.5, -14.0) + tr,
            Vec3::new(-4.0, 5.5, 2.0) + tr,
            128.0,
        )
        .moving_to(Vec3::new(16.0, 5.5, -14.0) - tr)
        .looking_to(Vec3::new(-4.0, 5.5, 2.0) - tr)
        .for_beats(3.0),
        CameraShot::hold(Vec3::new(7.0, 25.0, 0.0), Vec3::new(2.0, 0.0, 0.0), 128.0)
            .moving_to(Vec3::new(30.0, 5.0, 0.0))
            .looking_to(Vec3::new(0.0, 5.0, 0.0))
            .for_beats(3.0),
        CameraShot::hold(Vec3::new(20.0, 6.0, -4.0), Vec3::new(0.0, 6.0, -4.0), 256.0)
            .moving_to(Vec3::new(20.0, 8.0, 4.0))
            .looking_to(Vec3::new(0.0, 8.0, 4.0))
            .for_beats(6.0),
        // Outro: fast pull back
        CameraShot::hold(Vec3::new(10.0, 7.0, 0.0), Vec3::new(0.0, 7.0, 0.0), 8.0)
            .moving_to(Vec3::new(22.0, 7.0, 0.0))
            .for_beats(6.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFAULT_BPM, DEFAULT_FPS};

    #[derive(Debug, Default)]
    struct MockCamera {
        position: Vec3,
        target: Vec3,
    }

    impl CameraHandle for MockCamera {
        fn set_position(&mut self, position: Vec3) {
            self.position = position;
        }

        fn look_at(&mut self, target: Vec3) {
            self.target = target;
        }
    }

    fn pan(frames: usize, damp: f32) -> CameraSegment {
        CameraShot::hold(Vec3::ZERO, Vec3::Z, damp)
            .moving_to(Vec3::new(10.0, 0.0, 0.0))
            .for_frames(frames)
    }

    #[test]
    fn test_segments_concatenate() {
        let anim = CameraAnimation::new(&[pan(30, 4.0), pan(45, 8.0)]).unwrap();
        assert_eq!(anim.frame_count(), 75);
        assert_eq!(anim.segment_starts(), &[0, 30]);
    }

    #[test]
    fn test_first_frame_is_already_eased() {
        let anim = CameraAnimation::new(&[pan(10, 4.0)]).unwrap();
        assert!((anim.frame(0).position.x - 2.5).abs() < 1e-6);
        assert_eq!(anim.frame(0).look_at, Vec3::Z);
    }

    #[test]
    fn test_position_approaches_end_monotonically() {
        let anim = CameraAnimation::new(&[pan(200, 16.0)]).unwrap();
        let mut previous = 0.0;
        for f in 0..200 {
            let x = anim.frame(f).position.x;
            assert!(x > previous || x == 10.0);
            assert!(x <= 10.0);
            previous = x;
        }
        assert!(10.0 - previous < 0.01);
    }

    #[test]
    fn test_unit_damping_reaches_end() {
        let anim = CameraAnimation::new(&[pan(3, 1.0)]).unwrap();
        assert_eq!(anim.frame(0).position, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(anim.frame(2).position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_closer_to_end_as_damping_drops() {
        let end = Vec3::new(10.0, 0.0, 0.0);
        let gap = |damp: f32| {
            let anim = CameraAnimation::new(&[pan(20, damp)]).unwrap();
            anim.frame(i64::MAX).position.distance(end)
        };
        assert!(gap(64.0) > gap(16.0));
        assert!(gap(16.0) > gap(4.0));
        assert!(gap(4.0) > gap(1.0));
    }

    #[test]
    fn test_hold_stays_put() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let hold = CameraShot::hold(start, Vec3::ZERO, 64.0).for_frames(5);
        let anim = CameraAnimation::new(&[hold]).unwrap();
        for f in 0..5 {
            assert_eq!(anim.frame(f).position, start);
            assert_eq!(anim.frame(f).look_at, Vec3::ZERO);
        }
    }

    #[test]
    fn test_apply_to_camera_clamps() {
        let anim = CameraAnimation::new(&[pan(10, 4.0), pan(10, 2.0)]).unwrap();
        let mut camera = MockCamera::default();

        anim.apply_to_camera(-20, &mut camera);
        assert_eq!(camera.position, anim.frame(0).position);
        assert_eq!(camera.target, Vec3::Z);

        anim.apply_to_camera(10_000, &mut camera);
        assert_eq!(camera.position, anim.frame(19).position);
    }

    #[test]
    fn test_zero_frame_segment_is_config_error() {
        let err = CameraAnimation::new(&[pan(10, 4.0), pan(0, 4.0)]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySegment { index: 1 }));
    }

    #[test]
    fn test_bad_damping_is_config_error() {
        for damp in [0.0, 0.5, -3.0, f32::NAN, f32::INFINITY] {
            let err = CameraAnimation::new(&[pan(10, damp)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidDamping { index: 0, .. }));
        }
    }

    #[test]
    fn test_no_segments_is_config_error() {
        assert!(matches!(CameraAnimation::new(&[]), Err(ConfigError::NoSegments)));
    }

    #[test]
    fn test_script_follows_tempo() {
        let frames_at = |bpm: f64| -> usize {
            authored_script()
                .iter()
                .map(|cue| cue.to_segment(bpm, 60.0).frames)
                .sum()
        };
        // 67 beats; 30 frames per beat at 120 BPM
        assert_eq!(frames_at(120.0), 2010);
        assert_eq!(frames_at(108.0), 2235);
    }

    #[test]
    fn test_cue_json_is_flat() {
        let json = r#"{"beats": 3.0, "start": [1.0, 2.0, 3.0], "look_at": [0.0, 0.0, 0.0], "end": [4.0, 2.0, 3.0], "damp": 8.0}"#;
        let cue: CameraCue = serde_json::from_str(json).unwrap();
        assert_eq!(cue.beats, 3.0);
        assert_eq!(cue.shot.end, Some(Vec3::new(4.0, 2.0, 3.0)));
        assert_eq!(cue.to_segment(108.0, 60.0).frames, 100);
    }

    #[test]
    fn test_frames_for_beats() {
        assert_eq!(CameraSegment::frames_for_beats(3.0, 108.0, 60.0), 100);
        assert_eq!(CameraSegment::frames_for_beats(2.5, 108.0, 60.0), 84);
        assert_eq!(CameraSegment::frames_for_beats(17.0, 108.0, 60.0), 567);
    }

    #[test]
    fn test_authored_script_length() {
        let script: Vec<CameraSegment> = authored_script()
            .iter()
            .map(|cue| cue.to_segment(DEFAULT_BPM, DEFAULT_FPS))
            .collect();
        assert_eq!(script.len(), 10);
        let anim = CameraAnimation::new(&script).unwrap();
        // 84 + 84 + 567 + 400 + 400 + 100 + 100 + 100 + 200 + 200
        assert_eq!(anim.frame_count(), 2235);
    }

    #[test]
    fn test_segment_json_defaults_to_hold() {
        let json = r#"{"frames": 4, "start": [1.0, 2.0, 3.0], "look_at": [0.0, 0.0, 0.0], "damp": 8.0}"#;
        let segment: CameraSegment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.shot.end, None);
        let anim = CameraAnimation::new(&[segment]).unwrap();
        assert_eq!(anim.frame(3).position, Vec3::new(1.0, 2.0, 3.0));
    }
}
