//! Piecewise-linear remap curve applied to raw noise samples.

use serde::{Deserialize, Serialize};

/// One keyframe of a [`HeightCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Maps a raw noise sample to a height multiplier.
///
/// Keys are kept sorted by `time`. Between keys the value is linearly
/// interpolated; outside the key range the nearest end value holds. A curve
/// without keys evaluates to `1.0`, leaving samples unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct HeightCurve {
    keys: Vec<CurveKey>,
}

impl From<Vec<CurveKey>> for HeightCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<HeightCurve> for Vec<CurveKey> {
    fn from(curve: HeightCurve) -> Self {
        curve.keys
    }
}

impl HeightCurve {
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// A flat curve returning `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value)],
        }
    }

    /// A straight line through `(0, start)` and `(1, end)`.
    pub fn linear(start: f32, end: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, start), CurveKey::new(1.0, end)],
        }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn is_finite(&self) -> bool {
        self.keys
            .iter()
            .all(|k| k.time.is_finite() && k.value.is_finite())
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 1.0,
        };
        // Also catches NaN.
        if !(t > first.time) {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // first.time < t < last.time, so 1 <= upper < len.
        let upper = self.keys.partition_point(|k| k.time <= t);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        let f = (t - a.time) / span;
        a.value + (b.value - a.value) * f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_curve_is_identity_multiplier() {
        let curve = HeightCurve::default();
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert_eq!(curve.evaluate(0.73), 1.0);
    }

    #[test]
    fn interpolates_between_keys() {
        let curve = HeightCurve::new(vec![
            CurveKey::new(1.0, 2.0),
            CurveKey::new(0.0, 0.0),
            CurveKey::new(0.5, 1.0),
        ]);
        assert_eq!(curve.keys()[0].time, 0.0);
        assert!((curve.evaluate(0.25) - 0.5).abs() < 1e-6);
        assert!((curve.evaluate(0.75) - 1.5).abs() < 1e-6);
        assert_eq!(curve.evaluate(0.5), 1.0);
    }

    #[test]
    fn holds_end_values_outside_range() {
        let curve = HeightCurve::linear(0.2, 0.9);
        assert_eq!(curve.evaluate(-4.0), 0.2);
        assert_eq!(curve.evaluate(3.0), 0.9);
        assert_eq!(curve.evaluate(f32::NAN), 0.2);
    }

    #[test]
    fn ron_keys_are_sorted_on_load() {
        let curve: HeightCurve =
            ron::from_str("[(time: 1.0, value: 3.0), (time: 0.0, value: 1.0)]").unwrap();
        assert_eq!(curve.keys()[0], CurveKey::new(0.0, 1.0));
        assert!((curve.evaluate(0.5) - 2.0).abs() < 1e-6);
    }
}
