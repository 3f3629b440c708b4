//! Row (group) sort paced by the music
//!
//! Unlike the box sort, every comparison here is a "read" that consumes a fixed
//! slice of song time (a quarter beat). Reads mark the compared row as active
//! and the sorted prefix grows with the outer loop, so the renderer can light
//! rows up in time with the music.
//!
//! Reads stop on `right <= left`, so equal values never swap and the rows end up
//! in descending order with ties kept in input order.

use super::handle::{Highlight, RowHandle};
use super::timeline::{Settled, Timeline, TimelineBuilder, ease_step, settle};
use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// How many frames a single read occupies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadPacing {
    pub frames_per_read: f64,
}

impl ReadPacing {
    /// One read per quarter beat at the given tempo and frame rate
    pub fn from_tempo(bpm: f64, fps: f64) -> ConfigResult<Self> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(ConfigError::timing(format!("tempo must be positive, got {bpm}")));
        }
        if !(fps.is_finite() && fps > 0.0) {
            return Err(ConfigError::timing(format!("frame rate must be positive, got {fps}")));
        }
        Ok(Self {
            frames_per_read: 60.0 / bpm / READS_PER_BEAT * fps,
        })
    }

    /// Frame count the timeline must reach after `read_count` reads
    pub fn target_frame(&self, read_count: usize) -> f64 {
        read_count as f64 * self.frames_per_read
    }
}

impl Default for ReadPacing {
    fn default() -> Self {
        Self {
            frames_per_read: 60.0 / DEFAULT_BPM / READS_PER_BEAT * DEFAULT_FPS,
        }
    }
}

/// One recorded frame of the group sort
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFrame {
    /// Row positions, indexed by original row index
    pub positions: Box<[f64]>,
    /// Original index of the row being read, if a read is in progress
    pub active: Option<usize>,
    /// Highest row index known to be in the sorted prefix (-1 before anything is sorted)
    pub sorted_boundary: i64,
}

impl GroupFrame {
    /// Highlight for the row with original index `row`
    pub fn highlight_of(&self, row: usize) -> Option<Highlight> {
        if self.active == Some(row) {
            Some(Highlight::Active)
        } else if (row as i64) <= self.sorted_boundary {
            Some(Highlight::Sorted)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct GroupElement {
    value: i32,
    row_index: usize,
}

struct GroupSortRun {
    array: Vec<GroupElement>,
    positions: Vec<f64>,
    targets: Vec<f64>,
    frames: TimelineBuilder<GroupFrame>,
    active: Option<usize>,
    sorted: i64,
    read_count: usize,
    pacing: ReadPacing,
}

impl GroupSortRun {
    fn retarget(&mut self) {
        for (slot, element) in self.array.iter().enumerate() {
            self.targets[element.row_index] = slot as f64;
        }
    }

    fn snap(&mut self) {
        self.frames.push(GroupFrame {
            positions: self.positions.clone().into_boxed_slice(),
            active: self.active,
            sorted_boundary: self.sorted,
        });
    }

    fn update(&mut self) -> f64 {
        let diff = ease_step(&mut self.positions, &self.targets, GROUP_EASING);
        self.snap();
        diff
    }

    /// Consume one read's worth of song time
    fn render(&mut self) {
        self.read_count += 1;
        let target = self.pacing.target_frame(self.read_count);
        self.retarget();
        while (self.frames.len() as f64) < target {
            self.update();
        }
    }

    fn read(&mut self, slot: usize) -> i32 {
        let element = self.array[slot];
        self.active = Some(element.row_index);
        self.render();
        self.active = None;
        element.value
    }

    /// Ease the rows into their final slots
    fn drain(&mut self, max_steps: usize) -> Settled {
        self.retarget();
        let (frames, active, sorted) = (&mut self.frames, self.active, self.sorted);
        settle(
            "Group sort",
            &mut self.positions,
            &self.targets,
            GROUP_EASING,
            max_steps,
            |positions| {
                frames.push(GroupFrame {
                    positions: positions.into(),
                    active,
                    sorted_boundary: sorted,
                })
            },
        )
    }
}

/// Precomputed animation of the rows being insertion-sorted
#[derive(Debug, Clone)]
pub struct GroupSortingAnimation {
    frames: Timeline<GroupFrame>,
    read_count: usize,
    residual: f64,
}

impl GroupSortingAnimation {
    /// Build with the default pacing (108 BPM, 60 fps)
    pub fn new(values: &[i32]) -> ConfigResult<Self> {
        Self::with_pacing(values, ReadPacing::default())
    }

    pub fn with_pacing(values: &[i32], pacing: ReadPacing) -> ConfigResult<Self> {
        if values.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        if !(pacing.frames_per_read.is_finite() && pacing.frames_per_read > 0.0) {
            return Err(ConfigError::timing(format!(
                "frames per read must be positive, got {}",
                pacing.frames_per_read
            )));
        }

        let n = values.len();
        let mut run = GroupSortRun {
            array: values
                .iter()
                .enumerate()
                .map(|(row_index, &value)| GroupElement { value, row_index })
                .collect(),
            positions: (0..n).map(|i| i as f64).collect(),
            targets: (0..n).map(|i| i as f64).collect(),
            frames: TimelineBuilder::new(),
            active: None,
            sorted: 0,
            read_count: 0,
            pacing,
        };
        run.snap();
        run.render();

        for i in 1..n {
            run.sorted = i as i64;
            let mut j = i;
            while j > 0 {
                let right = run.read(j);
                let left = run.read(j - 1);
                if right <= left {
                    break;
                }
                run.array.swap(j, j - 1);
                j -= 1;
            }
        }
        let residual = run.drain(MAX_SETTLE_STEPS).residual;

        if let Some(first) = run.frames.get_mut(0) {
            first.sorted_boundary = -1;
        }

        let read_count = run.read_count;
        let frames = run.frames.finish().ok_or(ConfigError::NoGroups)?;
        log::debug!(
            "Built group sorting animation: {} rows, {} reads, {} frames",
            n,
            read_count,
            frames.len()
        );

        Ok(Self {
            frames,
            read_count,
            residual,
        })
    }

    /// Recorded frame at `frame`, clamped to the timeline
    pub fn frame(&self, frame: i64) -> &GroupFrame {
        self.frames.at(frame)
    }

    /// Number of recorded frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Renders performed, including the opening one
    pub fn read_count(&self) -> usize {
        self.read_count
    }

    /// Summed movement of the last recorded sub-frame
    pub fn residual_motion(&self) -> f64 {
        self.residual
    }

    /// Apply the clamped frame to `rows` (indexed by original row index).
    /// Rows beyond the sorted set are left untouched.
    pub fn apply_to<R: RowHandle>(&self, frame: i64, rows: &mut [R]) {
        let snapshot = self.frames.at(frame);
        for (j, (row, &x)) in rows.iter_mut().zip(snapshot.positions.iter()).enumerate() {
            row.set_position(x);
            row.set_highlight(snapshot.highlight_of(j));
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = &GroupFrame> {
        self.frames.iter()
    }
}
