//! Scalar TCB spline used by channel formulas.
//!
//! Hermite segments with chord tangents through the interior knots and zero
//! tangent at the outer knots. Because the boundary tangents are zero,
//! extrapolating linearly along them outside the knot range is the same as
//! holding the end values, which is what evaluation does.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Knot {
    pub position: f64,
    pub value: f64,
}

impl Knot {
    pub fn new(position: f64, value: f64) -> Knot {
        Knot { position, value }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    knots: Vec<Knot>,
}

impl Spline {
    /// Knots must be sorted by position; at least one is required.
    pub fn new(knots: Vec<Knot>) -> Spline {
        Spline { knots }
    }

    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    fn eval_segment(&self, x: f64, segment_idx: usize) -> f64 {
        let knots = &self.knots;

        let loc = knots[segment_idx].position;
        let scale = knots[segment_idx + 1].position - knots[segment_idx].position;

        let p0 = knots[segment_idx].value;
        let p1 = knots[segment_idx + 1].value;

        let m0 = if segment_idx == 0 {
            0.0
        } else {
            (knots[segment_idx + 1].value - knots[segment_idx - 1].value)
                / (knots[segment_idx + 1].position - knots[segment_idx - 1].position)
                * scale
        };

        let m1 = if segment_idx == knots.len() - 2 {
            0.0
        } else {
            (knots[segment_idx + 2].value - knots[segment_idx].value)
                / (knots[segment_idx + 2].position - knots[segment_idx].position)
                * scale
        };

        let t1 = (x - loc) / scale;
        let t2 = t1 * t1;
        let t3 = t2 * t1;

        (2.0 * t3 - 3.0 * t2 + 1.0) * p0
            + (t3 - 2.0 * t2 + t1) * m0
            + (-2.0 * t3 + 3.0 * t2) * p1
            + (t3 - t2) * m1
    }

    pub fn eval(&self, x: f64) -> f64 {
        let knots = &self.knots;
        let knot_count = knots.len();

        if x < knots[0].position {
            knots[0].value
        } else if x >= knots[knot_count - 1].position {
            knots[knot_count - 1].value
        } else {
            for i in 0..knot_count - 1 {
                if x >= knots[i].position && x < knots[i + 1].position {
                    return self.eval_segment(x, i);
                }
            }
            // only reachable for NaN inputs
            0.0
        }
    }
}
