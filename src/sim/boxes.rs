//! Single-row box sort
//!
//! Runs one insertion sort over `n` boxes and records the eased x-position of
//! every box for every sub-frame. Each swap is followed by a fixed settle of
//! `SETTLE_STEPS_PER_SWAP` sub-frames, so sort pacing is independent of music.

use super::rng::SortRng;
use super::timeline::{Settled, Timeline, TimelineBuilder, ease_step, settle};
use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// A box as it sits in the array being sorted
#[derive(Debug, Clone, Copy)]
struct SortElement {
    /// Sort key (box height rank)
    value: i32,
    /// Original box index, used to address positions
    box_index: usize,
}

/// Running state of the sort while frames are recorded
struct BoxSortRun {
    /// Elements in slot order
    array: Vec<SortElement>,
    /// Current x per box index
    positions: Vec<f64>,
    /// Target x per box index
    targets: Vec<f64>,
    frames: TimelineBuilder<Box<[f64]>>,
}

impl BoxSortRun {
    fn retarget(&mut self) {
        for (slot, element) in self.array.iter().enumerate() {
            self.targets[element.box_index] = slot as f64;
        }
    }

    fn snap(&mut self) {
        self.frames.push(self.positions.clone().into_boxed_slice());
    }

    /// Advance one sub-frame and record it; returns the summed movement
    fn update(&mut self) -> f64 {
        let diff = ease_step(&mut self.positions, &self.targets, BOX_EASING);
        self.snap();
        diff
    }

    fn settle_after_swap(&mut self) {
        self.retarget();
        for _ in 0..SETTLE_STEPS_PER_SWAP {
            self.update();
        }
    }

    /// Keep easing until the boxes are at rest (or `max_steps` run out)
    fn drain(&mut self, max_steps: usize) -> Settled {
        let frames = &mut self.frames;
        settle(
            "Box sort",
            &mut self.positions,
            &self.targets,
            BOX_EASING,
            max_steps,
            |positions| frames.push(positions.into()),
        )
    }
}

/// Precomputed animation of one row of boxes being insertion-sorted
#[derive(Debug, Clone)]
pub struct SortingAnimation {
    /// Value per original box index
    values: Vec<i32>,
    /// Box x-positions per frame, indexed by original box index
    frames: Timeline<Box<[f64]>>,
    /// Movement of the final recorded step
    residual: f64,
    swaps: usize,
}

impl SortingAnimation {
    /// Build the animation for `n` boxes.
    ///
    /// Values `1..n` are shuffled and `n` is appended so the last box is always
    /// the tallest. The slot order is then shuffled again for the opening
    /// layout. Uses two shuffles from `rng`.
    pub fn new(n: usize, rng: &mut SortRng) -> ConfigResult<Self> {
        if n == 0 {
            return Err(ConfigError::NoBoxes);
        }

        let mut values: Vec<i32> = (1..n as i32).collect();
        rng.shuffle(&mut values);
        values.push(n as i32);

        let mut array: Vec<SortElement> = values
            .iter()
            .enumerate()
            .map(|(box_index, &value)| SortElement { value, box_index })
            .collect();
        rng.shuffle(&mut array);

        let mut run = BoxSortRun {
            array,
            positions: vec![0.0; n],
            targets: vec![0.0; n],
            frames: TimelineBuilder::new(),
        };
        run.retarget();
        run.positions.copy_from_slice(&run.targets);
        run.snap();

        let mut swaps = 0;
        for i in 1..n {
            let mut j = i;
            while j > 0 && run.array[j].value < run.array[j - 1].value {
                run.array.swap(j, j - 1);
                j -= 1;
                swaps += 1;
                run.settle_after_swap();
            }
        }
        let residual = run.drain(MAX_SETTLE_STEPS).residual;

        let frames = run.frames.finish().ok_or(ConfigError::NoBoxes)?;
        log::debug!(
            "Built sorting animation: {} boxes, {} swaps, {} frames",
            n,
            swaps,
            frames.len()
        );

        Ok(Self {
            values,
            frames,
            residual,
            swaps,
        })
    }

    /// Number of boxes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value assigned to an original box slot
    ///
    /// # Panics
    /// Panics if `box_index >= self.len()`.
    pub fn value_of(&self, box_index: usize) -> i32 {
        self.values[box_index]
    }

    /// Box x-position (in slot units) at `frame`, clamped to the timeline
    ///
    /// # Panics
    /// Panics if `box_index >= self.len()`.
    pub fn position_at_frame(&self, box_index: usize, frame: i64) -> f64 {
        self.frames.at(frame)[box_index]
    }

    /// All box positions at `frame`, clamped to the timeline
    pub fn positions_at_frame(&self, frame: i64) -> &[f64] {
        self.frames.at(frame)
    }

    /// Number of recorded frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Summed movement of the last recorded sub-frame
    pub fn residual_motion(&self) -> f64 {
        self.residual
    }

    /// Adjacent swaps performed by the sort
    pub fn swap_count(&self) -> usize {
        self.swaps
    }
}
