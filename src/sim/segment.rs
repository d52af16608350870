//! Track segment geometry
//!
//! A segment is one horizontal slice of road:
//! - x: centre of the road (percent of viewport width)
//! - width: drivable width (percent of viewport width)
//! - y: top edge in screen pixels, growing downward
//! - curve: lateral drift handed to the next generated segment


/// One procedurally generated slice of track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSegment {
    /// Stable key, strictly increasing in generation order
    pub id: u32,
    /// Centre position (percent)
    pub x: f32,
    /// Screen position (px)
    pub y: f32,
    /// Drivable width (percent)
    pub width: f32,
    /// Signed curvature applied when generating the next segment's `x`
    pub curve: f32,
}

impl TrackSegment {
    pub fn new(id: u32, x: f32, y: f32, width: f32, curve: f32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            curve,
        }
    }

    /// Left edge of the road (percent)
    #[inline]
    pub fn left_edge(&self) -> f32 {
        self.x - self.width / 2.0
    }

    /// Right edge of the road (percent)
    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Safe lateral range once `margin` is taken off each edge
    pub fn drivable_span(&self, margin: f32) -> (f32, f32) {
        (self.left_edge() + margin, self.right_edge() - margin)
    }

    /// Whether a car at `lateral` keeps at least `margin` from both edges
    pub fn is_on_track(&self, lateral: f32, margin: f32) -> bool {
        let (min, max) = self.drivable_span(margin);
        lateral >= min && lateral <= max
    }

    /// Whether the segment has scrolled past `limit`
    #[inline]
    pub fn is_below(&self, limit: f32) -> bool {
        self.y > limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let seg = TrackSegment::new(0, 50.0, 0.0, 60.0, 0.0);
        assert_eq!(seg.left_edge(), 20.0);
        assert_eq!(seg.right_edge(), 80.0);
        assert_eq!(seg.drivable_span(5.0), (25.0, 75.0));
    }

    #[test]
    fn test_on_track_margin() {
        let seg = TrackSegment::new(0, 50.0, 0.0, 60.0, 0.0);
        assert!(!seg.is_on_track(15.0, 5.0));
        assert!(!seg.is_on_track(24.9, 5.0));
        assert!(seg.is_on_track(25.0, 5.0));
        assert!(seg.is_on_track(30.0, 5.0));
        assert!(seg.is_on_track(75.0, 5.0));
        assert!(!seg.is_on_track(76.0, 5.0));
    }

    #[test]
    fn test_off_centre_segment() {
        let seg = TrackSegment::new(3, 30.0, 0.0, 40.0, -1.2);
        assert_eq!(seg.drivable_span(5.0), (15.0, 45.0));
        assert!(seg.is_on_track(20.0, 5.0));
        assert!(!seg.is_on_track(50.0, 5.0));
    }

    #[test]
    fn test_is_below() {
        let seg = TrackSegment::new(0, 50.0, 900.0, 60.0, 0.0);
        assert!(!seg.is_below(900.0));
        assert!(seg.is_below(899.9));
    }
}
