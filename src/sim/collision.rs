//! Collision detection between the car and the road edges
//!
//! The car never moves vertically: it sits on a fixed screen plane and the
//! track scrolls under it. A crash is simply the car's lateral position
//! leaving the drivable span of the segment under that plane.

use serde::{Deserialize, Serialize};

use super::segment::TrackSegment;
use super::track::Track;
use crate::tuning::Tuning;

/// How the segment under the car is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionProbe {
    /// Segment nearest the car plane by `y`; never skips a frame
    #[default]
    Nearest,
    /// First segment strictly inside the detection band; may find nothing
    /// at high speed
    Band,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Car is within the drivable span
    Clear { segment_id: u32 },
    /// Car is too close to (or past) an edge
    OffTrack {
        segment_id: u32,
        /// Drivable span the car left (percent)
        span: (f32, f32),
    },
    /// No segment was found under the car this frame
    NoSegment,
}

impl Contact {
    pub fn is_crash(&self) -> bool {
        matches!(self, Contact::OffTrack { .. })
    }
}

/// Locate the segment under the car
pub fn probe<'a>(
    track: &'a Track,
    viewport_height: f32,
    tuning: &Tuning,
) -> Option<&'a TrackSegment> {
    match tuning.probe {
        CollisionProbe::Nearest => {
            let plane = viewport_height * tuning.car_plane;
            track
                .segments()
                .min_by(|a, b| (a.y - plane).abs().total_cmp(&(b.y - plane).abs()))
        }
        CollisionProbe::Band => {
            let top = viewport_height * tuning.band_top;
            let bottom = viewport_height * tuning.band_bottom;
            track.segments().find(|s| s.y > top && s.y < bottom)
        }
    }
}

/// Check the car's lateral position against the segment under it
pub fn check(track: &Track, lateral: f32, viewport_height: f32, tuning: &Tuning) -> Contact {
    let Some(segment) = probe(track, viewport_height, tuning) else {
        return Contact::NoSegment;
    };

    if segment.is_on_track(lateral, tuning.edge_margin) {
        Contact::Clear {
            segment_id: segment.id,
        }
    } else {
        Contact::OffTrack {
            segment_id: segment.id,
            span: segment.drivable_span(tuning.edge_margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straight track, 50px apart, newest at `top_y`
    fn straight_track(top_y: f32) -> Track {
        let segments = (0..20)
            .map(|i| TrackSegment::new(i, 50.0, top_y + (19 - i) as f32 * 50.0, 60.0, 0.0))
            .collect();
        Track::from_segments(segments).unwrap()
    }

    #[test]
    fn test_crash_near_left_edge() {
        let track = straight_track(0.0);
        let tuning = Tuning::default();

        // Left edge 20, margin 5 -> threshold 25
        let contact = check(&track, 15.0, 800.0, &tuning);
        assert!(contact.is_crash());
        assert!(matches!(contact, Contact::OffTrack { span: (25.0, 75.0), .. }));

        assert!(!check(&track, 30.0, 800.0, &tuning).is_crash());
    }

    #[test]
    fn test_crash_near_right_edge() {
        let track = straight_track(0.0);
        let tuning = Tuning::default();
        assert!(check(&track, 76.0, 800.0, &tuning).is_crash());
        assert!(!check(&track, 75.0, 800.0, &tuning).is_crash());
    }

    #[test]
    fn test_nearest_probe_picks_car_plane() {
        // Plane at 600 for an 800px viewport; segment ids 7 sits at 600
        let track = straight_track(0.0);
        let tuning = Tuning::default();
        let seg = probe(&track, 800.0, &tuning).unwrap();
        assert_eq!(seg.y, 600.0);
        assert_eq!(seg.id, 7);
    }

    #[test]
    fn test_band_probe_can_miss() {
        let tuning = Tuning {
            probe: CollisionProbe::Band,
            ..Default::default()
        };
        // Band is (560, 640) for 800px. With segments on 50px steps starting
        // at 10, 560 < 610 < 640 is inside.
        let track = straight_track(10.0);
        assert_eq!(probe(&track, 800.0, &tuning).map(|s| s.y), Some(610.0));

        // A sparse window with nothing in the band skips the check
        let sparse = Track::from_segments(vec![
            TrackSegment::new(0, 50.0, 700.0, 60.0, 0.0),
            TrackSegment::new(1, 90.0, 300.0, 10.0, 0.0),
        ])
        .unwrap();
        assert_eq!(check(&sparse, 50.0, 800.0, &tuning), Contact::NoSegment);
    }

    #[test]
    fn test_nearest_probe_never_skips() {
        let tuning = Tuning::default();
        let sparse = Track::from_segments(vec![
            TrackSegment::new(0, 50.0, 700.0, 60.0, 0.0),
            TrackSegment::new(1, 90.0, 300.0, 10.0, 0.0),
        ])
        .unwrap();
        assert!(matches!(
            check(&sparse, 50.0, 800.0, &tuning),
            Contact::Clear { segment_id: 0 }
        ));
    }
}
