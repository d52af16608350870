//! Rolling track window and procedural generation
//!
//! The window is stored oldest-first: the front segment sits lowest on screen
//! (largest `y`), the back segment is the newest (smallest `y`).

use std::collections::VecDeque;

use rand::Rng;

use super::segment::TrackSegment;
use crate::consts::CENTER;
use crate::tuning::Tuning;

/// Live window of track segments
#[derive(Debug, Clone)]
pub struct Track {
    segments: VecDeque<TrackSegment>,
    /// Most recently generated segment, kept even after it scrolls away
    newest: TrackSegment,
}

impl Track {
    /// Generate the opening window: a straight, centred run with gentle curves
    pub fn new<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Self {
        let count = tuning.segment_count;
        let mut segments = VecDeque::with_capacity(count);

        for i in 0..count {
            let curve = symmetric(rng, tuning.initial_curve);
            let y = (count - 1 - i) as f32 * tuning.segment_spacing;
            segments.push_back(TrackSegment::new(i as u32, CENTER, y, tuning.base_width, curve));
        }

        // segment_count >= 2 is enforced by Tuning::validate
        let newest = segments
            .back()
            .copied()
            .unwrap_or_else(|| TrackSegment::new(0, CENTER, 0.0, tuning.base_width, 0.0));

        log::debug!("Generated opening track of {} segments", segments.len());

        Self { segments, newest }
    }

    /// Build a window from explicit segments (oldest first)
    ///
    /// Returns `None` for an empty list: refilling needs a newest segment.
    pub fn from_segments(segments: Vec<TrackSegment>) -> Option<Self> {
        let newest = *segments.last()?;
        Some(Self {
            segments: segments.into(),
            newest,
        })
    }

    /// Scroll every segment toward the viewer
    pub fn advance(&mut self, dy: f32) {
        for segment in &mut self.segments {
            segment.y += dy;
        }
        // The refill anchor scrolls with the road, live or evicted
        self.newest.y += dy;
    }

    /// Drop segments that scrolled past `limit`, returning how many were dropped
    pub fn evict(&mut self, limit: f32) -> usize {
        let before = self.segments.len();
        self.segments.retain(|s| !s.is_below(limit));
        before - self.segments.len()
    }

    /// Append new segments above the current top until the window is full
    ///
    /// Each iteration appends exactly one segment, so this runs
    /// `segment_count - len` times.
    pub fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning) -> usize {
        let deficit = tuning.segment_count.saturating_sub(self.segments.len());
        for _ in 0..deficit {
            let next = next_segment(&self.newest, rng, tuning);
            self.segments.push_back(next);
            self.newest = next;
        }
        deficit
    }

    /// Newest generated segment (top of the screen)
    pub fn newest(&self) -> &TrackSegment {
        &self.newest
    }

    /// Live segments, oldest first
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &TrackSegment> + ExactSizeIterator {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Generate the segment that follows `prev`
pub fn next_segment<R: Rng + ?Sized>(prev: &TrackSegment, rng: &mut R, tuning: &Tuning) -> TrackSegment {
    let curve = symmetric(rng, tuning.curve_range);
    let x = (prev.x + prev.curve).clamp(tuning.center_min, tuning.center_max);
    let width = tuning.base_width + symmetric(rng, tuning.width_noise);

    TrackSegment::new(
        prev.id.wrapping_add(1),
        x,
        prev.y - tuning.segment_spacing,
        width,
        curve,
    )
}

/// Uniform sample in `[-amplitude, amplitude]`
fn symmetric<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        return 0.0;
    }
    rng.random_range(-amplitude..=amplitude)
}
