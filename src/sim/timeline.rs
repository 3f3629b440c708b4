//! Append-only frame timelines
//!
//! Builders push one snapshot per sub-frame and then freeze the result. Reads
//! clamp the frame number, so seeking past either end holds the edge frame.

use crate::clamp_frame;
use crate::consts::SETTLE_THRESHOLD;

/// Growable list of per-frame snapshots used while a builder runs
#[derive(Debug, Clone)]
pub struct TimelineBuilder<T> {
    frames: Vec<T>,
}

impl<T> Default for TimelineBuilder<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T> TimelineBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame
    pub fn push(&mut self, frame: T) {
        self.frames.push(frame);
    }

    /// Frames recorded so far
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Mutable access to an already recorded frame (used for fix-ups before freezing)
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.frames.get_mut(index)
    }

    /// Freeze into an immutable timeline. Returns `None` if nothing was recorded.
    pub fn finish(self) -> Option<Timeline<T>> {
        if self.is_empty() {
            None
        } else {
            Some(Timeline {
                frames: self.frames.into_boxed_slice(),
            })
        }
    }
}

/// Immutable, non-empty sequence of frames
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    frames: Box<[T]>,
}

impl<T> Timeline<T> {
    /// Frame at `frame`, clamped into `[0, len - 1]`
    #[inline]
    pub fn at(&self, frame: i64) -> &T {
        &self.frames[clamp_frame(frame, self.frames.len())]
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.frames.iter()
    }
}

/// One easing sub-frame: move every position `1/easing` of the way to its target.
/// Returns the summed absolute movement.
pub fn ease_step(positions: &mut [f64], targets: &[f64], easing: f64) -> f64 {
    let mut diff = 0.0;
    for (x, target) in positions.iter_mut().zip(targets) {
        let dx = (target - *x) / easing;
        *x += dx;
        diff += dx.abs();
    }
    diff
}

/// Outcome of [`settle`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settled {
    /// Sub-frames recorded
    pub steps: usize,
    /// Summed movement of the last sub-frame
    pub residual: f64,
    /// True if `max_steps` ran out before motion fell under the threshold
    pub capped: bool,
}

/// Ease `positions` toward `targets` until a sub-frame moves no more than
/// `SETTLE_THRESHOLD` in total, handing every sub-frame to `record`.
/// Gives up after `max_steps` sub-frames.
pub fn settle(
    label: &str,
    positions: &mut [f64],
    targets: &[f64],
    easing: f64,
    max_steps: usize,
    mut record: impl FnMut(&[f64]),
) -> Settled {
    let mut steps = 0;
    let mut residual = f64::INFINITY;
    while steps < max_steps {
        residual = ease_step(positions, targets, easing);
        record(positions);
        steps += 1;
        if residual <= SETTLE_THRESHOLD {
            return Settled {
                steps,
                residual,
                capped: false,
            };
        }
    }
    log::warn!(
        "{} still moving after {} settle steps (diff {:.6}), stopping",
        label,
        steps,
        residual
    );
    Settled {
        steps,
        residual,
        capped: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_timeline(n: i32) -> Timeline<i32> {
        let mut builder = TimelineBuilder::new();
        for i in 0..n {
            builder.push(i * 10);
        }
        builder.finish().expect("non-empty")
    }

    #[test]
    fn test_empty_builder_does_not_finish() {
        let builder: TimelineBuilder<f64> = TimelineBuilder::new();
        assert!(builder.finish().is_none());
    }

    #[test]
    fn test_clamped_reads() {
        let timeline = make_timeline(5);
        assert_eq!(*timeline.at(-100), 0);
        assert_eq!(*timeline.at(0), 0);
        assert_eq!(*timeline.at(3), 30);
        assert_eq!(*timeline.at(4), 40);
        assert_eq!(*timeline.at(5), 40);
        assert_eq!(*timeline.at(1_000_000), 40);
        assert_eq!(timeline.len(), 5);
    }

    #[test]
    fn test_seeking_backwards_is_stateless() {
        let timeline = make_timeline(8);
        let forward: Vec<i32> = (0..8).map(|f| *timeline.at(f)).collect();
        let backward: Vec<i32> = (0..8).rev().map(|f| *timeline.at(f)).collect();
        let mut reversed = backward.clone();
        reversed.reverse();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_ease_step_moves_fraction_of_remaining_distance() {
        let mut xs = vec![0.0, 10.0];
        let targets = vec![32.0, 10.0];
        let diff = ease_step(&mut xs, &targets, 32.0);
        assert!((xs[0] - 1.0).abs() < 1e-12);
        assert_eq!(xs[1], 10.0);
        assert!((diff - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_settle_stops_under_threshold() {
        let mut xs = vec![0.0, 5.0];
        let mut recorded = 0;
        let settled = settle("test", &mut xs, &[3.0, 1.0], 16.0, 100_000, |_| recorded += 1);
        assert!(!settled.capped);
        assert!(settled.residual <= SETTLE_THRESHOLD);
        assert_eq!(settled.steps, recorded);
        assert!((xs[0] - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_settle_gives_up_at_step_cap() {
        let mut xs = vec![0.0; 4];
        let targets = vec![100.0; 4];
        let mut snapshots = Vec::new();
        let settled = settle("test", &mut xs, &targets, 32.0, 3, |p| snapshots.push(p.to_vec()));
        assert!(settled.capped);
        assert_eq!(settled.steps, 3);
        assert!(settled.residual > SETTLE_THRESHOLD);
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[2], xs);
    }

    #[test]
    fn test_settle_with_zero_cap_records_nothing() {
        let mut xs = vec![0.0];
        let settled = settle("test", &mut xs, &[1.0], 32.0, 0, |_| panic!("no frames expected"));
        assert!(settled.capped);
        assert_eq!(settled.steps, 0);
        assert_eq!(xs, vec![0.0]);
    }
}
