//! Deterministic timeline simulation module
//!
//! Every animation is simulated once, up front, into immutable per-frame
//! timelines. This module must stay pure and deterministic:
//! - Seeded RNG only, passed explicitly
//! - Fixed easing per recorded frame (no wall-clock time)
//! - Reads clamp the frame number and never mutate
//! - No rendering or platform dependencies

pub mod boxes;
pub mod camera;
pub mod groups;
pub mod handle;
pub mod rng;
pub mod timeline;

pub use boxes::SortingAnimation;
pub use camera::{CameraAnimation, CameraCue, CameraFrame, CameraSegment, CameraShot, authored_script};
pub use groups::{GroupFrame, GroupSortingAnimation, ReadPacing};
pub use handle::{CameraHandle, Highlight, RowHandle};
pub use rng::SortRng;
pub use timeline::{Timeline, TimelineBuilder};
