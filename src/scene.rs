//! Scene composition and frame sampling
//!
//! Builds every timeline of the video once and answers "what does frame N look
//! like" for any frame number. Rows are laid out along z and sorted by the
//! group sort; boxes inside a row are laid out along x and sorted by their own
//! row's box sort. The group sort starts `group_start_frame` frames in.

use serde::{Deserialize, Serialize};

use crate::consts::GRID_SPACING;
use crate::error::ConfigResult;
use crate::settings::Settings;
use crate::sim::{CameraAnimation, CameraFrame, GroupSortingAnimation, SortRng, SortingAnimation};

pub use crate::sim::{CameraHandle, Highlight, RowHandle};

/// A row that also positions its own boxes
pub trait GridRowHandle: RowHandle {
    /// World-space x of box `box_index` (relative to the row)
    fn set_box_x(&mut self, box_index: usize, x: f64);
}

/// World z of a row sitting at slot `position`
#[inline]
pub fn row_z(position: f64) -> f64 {
    -(position - 8.0) * GRID_SPACING
}

/// World x of a box sitting at slot `position` in a row of `columns` boxes
#[inline]
pub fn box_x(position: f64, columns: usize) -> f64 {
    (position - (columns as f64 - 1.0) / 2.0) * GRID_SPACING
}

/// Static geometry of one box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxLayout {
    pub value: i32,
    pub height: f64,
    /// Small z nudge so equal faces never z-fight
    pub z_offset: f64,
}

/// Static geometry of one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    pub note: i32,
    pub max_height: f64,
    pub x_offset: f64,
    pub boxes: Vec<BoxLayout>,
}

impl RowLayout {
    fn new(note: i32, animation: &SortingAnimation) -> Self {
        let max_height = 0.2 + (note as f64 + 10.0) / 32.0;
        let boxes = (0..animation.len())
            .map(|i| {
                let value = animation.value_of(i);
                BoxLayout {
                    value,
                    height: (value as f64 * 0.75 + 1.0) * max_height,
                    z_offset: -(value as f64) / 256.0,
                }
            })
            .collect();
        Self {
            note,
            max_height,
            x_offset: -(note as f64) / 256.0,
            boxes,
        }
    }

    /// Box that carries the row highlight (the deterministic tallest box)
    pub fn highlight_box(&self) -> usize {
        self.boxes.len() - 1
    }
}

/// Dynamic state of one row at one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSample {
    pub z: f64,
    pub highlight: Option<Highlight>,
    /// World x per box, indexed by original box index
    pub box_x: Vec<f64>,
}

/// Everything that moves, at one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    pub frame: i64,
    pub camera: CameraFrame,
    pub rows: Vec<RowSample>,
}

/// Fully built scene: layout plus every timeline
#[derive(Debug, Clone)]
pub struct Scene {
    columns: usize,
    group_start: i64,
    layout: Vec<RowLayout>,
    boxes: Vec<SortingAnimation>,
    groups: GroupSortingAnimation,
    camera: CameraAnimation,
}

impl Scene {
    /// Build every timeline. Rows draw from one RNG in row order.
    pub fn new(settings: &Settings) -> ConfigResult<Self> {
        settings.validate()?;

        let mut rng = SortRng::new(&settings.seed);
        let boxes = settings
            .notes
            .iter()
            .map(|_| SortingAnimation::new(settings.columns, &mut rng))
            .collect::<ConfigResult<Vec<_>>>()?;
        let layout = settings
            .notes
            .iter()
            .zip(&boxes)
            .map(|(&note, animation)| RowLayout::new(note, animation))
            .collect();

        let groups = GroupSortingAnimation::with_pacing(&settings.notes, settings.read_pacing()?)?;
        let camera = CameraAnimation::new(&settings.camera_segments())?;

        log::info!(
            "Scene ready: {} rows x {} boxes, group sort {} frames from frame {}, camera {} frames",
            settings.notes.len(),
            settings.columns,
            groups.frame_count(),
            settings.group_start_frame(),
            camera.frame_count()
        );

        Ok(Self {
            columns: settings.columns,
            group_start: settings.group_start_frame(),
            layout,
            boxes,
            groups,
            camera,
        })
    }

    pub fn layout(&self) -> &[RowLayout] {
        &self.layout
    }

    pub fn row_count(&self) -> usize {
        self.layout.len()
    }

    /// Frame at which the group sort starts
    pub fn group_start(&self) -> i64 {
        self.group_start
    }

    /// Last frame at which anything still changes
    pub fn last_animated_frame(&self) -> i64 {
        let boxes = self.boxes.iter().map(|b| b.frame_count()).max().unwrap_or(1) as i64 - 1;
        let groups = self.group_start + self.groups.frame_count() as i64 - 1;
        let camera = self.camera.frame_count() as i64 - 1;
        boxes.max(groups).max(camera)
    }

    /// Sample every timeline at `frame`
    pub fn sample(&self, frame: i64) -> FrameSample {
        let group_frame = self.groups.frame(frame.saturating_sub(self.group_start));
        let rows = self
            .boxes
            .iter()
            .enumerate()
            .map(|(row, animation)| RowSample {
                z: row_z(group_frame.positions[row]),
                highlight: group_frame.highlight_of(row),
                box_x: animation
                    .positions_at_frame(frame)
                    .iter()
                    .map(|&x| box_x(x, self.columns))
                    .collect(),
            })
            .collect();

        FrameSample {
            frame,
            camera: *self.camera.frame(frame),
            rows,
        }
    }

    /// Apply `frame` to the renderer's rows and camera. Rows get their slot
    /// position through `RowHandle`; boxes get world x.
    pub fn render<R: GridRowHandle, C: CameraHandle>(&self, frame: i64, rows: &mut [R], camera: &mut C) {
        for (row, animation) in rows.iter_mut().zip(&self.boxes) {
            for (i, &x) in animation.positions_at_frame(frame).iter().enumerate() {
                row.set_box_x(i, box_x(x, self.columns));
            }
        }
        self.groups.apply_to(frame.saturating_sub(self.group_start), rows);
        self.camera.apply_to_camera(frame, camera);
    }
}
