//! Capabilities the timelines write into
//!
//! The renderer implements these for its rows and camera; the simulation never
//! sees a scene graph.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Highlight state of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// Row is being compared right now
    Active,
    /// Row is inside the sorted prefix
    Sorted,
}

/// A row (group of boxes) that the group sort moves and highlights
pub trait RowHandle {
    /// Row position in slot units
    fn set_position(&mut self, position: f64);
    /// `None` means the default, unhighlighted look
    fn set_highlight(&mut self, highlight: Option<Highlight>);
}

/// A camera driven by the camera path
pub trait CameraHandle {
    fn set_position(&mut self, position: Vec3);
    fn look_at(&mut self, target: Vec3);
}
