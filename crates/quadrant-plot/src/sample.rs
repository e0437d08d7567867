//! Function sampling.

use quadrant_core::{EvalError, ExprArena, ExprHandle};

/// Samples of a function over a range; `None` marks a gap.
#[derive(Clone, Debug, PartialEq)]
pub struct Samples {
    /// `(x, f(x))` pairs in increasing `x`.
    pub points: Vec<(f64, Option<f64>)>,
}

impl Samples {
    /// Samples `f` at `count` evenly spaced points of `[start, end]`.
    ///
    /// Fails on the first point that cannot be evaluated. Infinite values
    /// become gaps.
    ///
    /// # Errors
    ///
    /// Returns the evaluation error of the first failing point.
    pub fn strict(
        arena: &ExprArena,
        f: ExprHandle,
        var: ExprHandle,
        start: f64,
        end: f64,
        count: usize,
    ) -> Result<Self, EvalError> {
        let points = linspace(start, end, count)
            .map(|x| Ok((x, finite(arena.evaluate_at(f, var, x)?))))
            .collect::<Result<_, EvalError>>()?;
        Ok(Self { points })
    }

    /// Samples `f` at `count` evenly spaced points of `[start, end]`,
    /// leaving a gap wherever evaluation fails.
    pub fn lenient(
        arena: &ExprArena,
        f: ExprHandle,
        var: ExprHandle,
        start: f64,
        end: f64,
        count: usize,
    ) -> Self {
        let points = linspace(start, end, count)
            .map(|x| (x, arena.evaluate_at(f, var, x).ok().and_then(finite)))
            .collect();
        Self { points }
    }

    /// Runs of consecutive defined points.
    pub fn segments(&self) -> impl Iterator<Item = Vec<(f64, f64)>> + '_ {
        self.points
            .split(|(_, y)| y.is_none())
            .filter(|run| !run.is_empty())
            .map(|run| run.iter().filter_map(|&(x, y)| y.map(|y| (x, y))).collect())
    }

    /// Smallest and largest defined value.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|&(_, y)| y)
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}

fn finite(y: f64) -> Option<f64> {
    y.is_finite().then_some(y)
}

#[allow(clippy::cast_precision_loss)]
fn linspace(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        (end - start) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |i| if i + 1 == count { end } else { start + step * i as f64 })
}
