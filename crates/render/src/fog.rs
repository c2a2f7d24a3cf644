//! Distance fog.
//!
//! With `max` the half-extent in tiles:
//! ```text
//! 0 ........ start (0.6 max) ........ max ........ extend (1.2 max) ....
//! |  content  |  content + overlay 0->f  | overlay 0->f only | skipped
//! ```
//! `f` is the fog intensity as a fraction.

/// Fraction of the half-extent where content starts to darken.
pub const FOG_START_FACTOR: f64 = 0.6;

/// Fraction of the half-extent where the fog band ends.
pub const FOG_EXTEND_FACTOR: f64 = 1.2;

/// What to draw for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FogDecision {
    /// Beyond the fog band: draw nothing.
    Skip,
    /// Inside the band: a flat fog rectangle with this opacity, no content.
    FogOnly(f32),
    /// Draw content, then an overlay if the opacity is positive.
    Content { overlay: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogParams {
    pub max: f64,
    pub start: f64,
    pub extend: f64,
    /// Peak overlay opacity, `fog_intensity / 100`.
    pub strength: f64,
}

impl FogParams {
    pub fn new(half_extent: f64, fog_intensity: u32) -> Self {
        Self {
            max: half_extent,
            start: half_extent * FOG_START_FACTOR,
            extend: half_extent * FOG_EXTEND_FACTOR,
            strength: fog_intensity.min(100) as f64 / 100.0,
        }
    }

    pub fn decide(&self, distance: f64) -> FogDecision {
        if distance > self.extend {
            FogDecision::Skip
        } else if distance > self.max {
            FogDecision::FogOnly(self.ramp(distance, self.max, self.extend))
        } else if distance > self.start {
            FogDecision::Content {
                overlay: self.ramp(distance, self.start, self.max),
            }
        } else {
            FogDecision::Content { overlay: 0.0 }
        }
    }

    fn ramp(&self, distance: f64, from: f64, to: f64) -> f32 {
        let span = to - from;
        if span <= 0.0 {
            return self.strength as f32;
        }
        (self.strength * ((distance - from) / span).clamp(0.0, 1.0)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(decision: FogDecision) -> f32 {
        match decision {
            FogDecision::Content { overlay } => overlay,
            other => panic!("expected content, got {other:?}"),
        }
    }

    #[test]
    fn thresholds() {
        let fog = FogParams::new(10.0, 50);
        assert_eq!(fog.start, 6.0);
        assert_eq!(fog.extend, 12.0);
        assert_eq!(fog.strength, 0.5);
    }

    #[test]
    fn clear_inside_start() {
        let fog = FogParams::new(10.0, 75);
        assert_eq!(fog.decide(0.0), FogDecision::Content { overlay: 0.0 });
        assert_eq!(fog.decide(6.0), FogDecision::Content { overlay: 0.0 });
    }

    #[test]
    fn overlay_is_monotonic_and_peaks_at_max() {
        let fog = FogParams::new(16.0, 75);
        let mut last = 0.0;
        let mut d = fog.start;
        while d <= fog.max {
            let o = overlay(fog.decide(d));
            assert!(o >= last, "opacity fell at distance {d}");
            last = o;
            d += 0.25;
        }
        assert!((overlay(fog.decide(fog.max)) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn band_ramps_then_skips() {
        let fog = FogParams::new(10.0, 100);
        let mut last = -1.0;
        for d in [10.5, 11.0, 11.5, 12.0] {
            match fog.decide(d) {
                FogDecision::FogOnly(o) => {
                    assert!(o > last);
                    last = o;
                }
                other => panic!("expected fog band at {d}, got {other:?}"),
            }
        }
        assert!((last - 1.0).abs() < 1e-6);
        assert_eq!(fog.decide(12.01), FogDecision::Skip);
        assert_eq!(fog.decide(100.0), FogDecision::Skip);
    }

    #[test]
    fn zero_intensity_never_darkens() {
        let fog = FogParams::new(10.0, 0);
        assert_eq!(fog.decide(9.0), FogDecision::Content { overlay: 0.0 });
        assert_eq!(fog.decide(11.0), FogDecision::FogOnly(0.0));
    }
}
