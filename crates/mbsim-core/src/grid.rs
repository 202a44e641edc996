//! Sampling grids and sampled trajectories.

use serde::Serialize;

use crate::constants::GRID_UNIFORMITY_TOLERANCE;
use crate::dynamics::State;
use crate::error::SimError;

/// Strictly increasing set of output times.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// `samples` evenly spaced points from `start` to `end` inclusive.
    ///
    /// ```
    /// use mbsim_core::grid::TimeGrid;
    ///
    /// let grid = TimeGrid::linspace(0.0, 5e-6, 5000).unwrap();
    /// assert_eq!(grid.len(), 5000);
    /// assert_eq!(grid.points()[4999], 5e-6);
    /// ```
    pub fn linspace(start: f64, end: f64, samples: usize) -> Result<Self, SimError> {
        if samples < 2 {
            return Err(SimError::invalid(format!(
                "time grid needs at least 2 samples (got {samples})"
            )));
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(SimError::invalid(format!(
                "time grid bounds must be finite with end > start (got {start}..{end})"
            )));
        }
        let step = (end - start) / (samples - 1) as f64;
        let mut points: Vec<f64> = (0..samples).map(|i| start + step * i as f64).collect();
        // Pin the last point exactly
        points[samples - 1] = end;
        Self::from_points(points)
    }

    /// Use an explicit set of points. They must be finite and strictly increasing.
    pub fn from_points(points: Vec<f64>) -> Result<Self, SimError> {
        if points.is_empty() {
            return Err(SimError::invalid("time grid is empty"));
        }
        if let Some(bad) = points.iter().find(|t| !t.is_finite()) {
            return Err(SimError::invalid(format!(
                "time grid contains a non-finite point ({bad})"
            )));
        }
        if let Some(i) = points.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SimError::invalid(format!(
                "time grid is not strictly increasing at index {}",
                i + 1
            )));
        }
        Ok(Self { points })
    }

    /// Grid points.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; grids are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.points[0]
    }

    /// Last point.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Spacing of a uniform grid, `t[1] − t[0]`.
    ///
    /// Returns `None` for single-point grids and for grids whose spacing
    /// varies by more than a relative 1e-9.
    #[must_use]
    pub fn uniform_spacing(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        let dt = self.points[1] - self.points[0];
        let tol = (dt * GRID_UNIFORMITY_TOLERANCE).max(4.0 * f64::EPSILON * self.end().abs());
        let uniform = self
            .points
            .windows(2)
            .all(|w| ((w[1] - w[0]) - dt).abs() <= tol);
        uniform.then_some(dt)
    }
}

/// A trajectory sampled on a [`TimeGrid`], stored column-wise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    times: Vec<f64>,
    radius: Vec<f64>,
    velocity: Vec<f64>,
}

impl Trajectory {
    /// Empty trajectory with room for `capacity` samples.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            radius: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample.
    pub fn push(&mut self, t: f64, state: State) {
        self.times.push(t);
        self.radius.push(state.radius);
        self.velocity.push(state.velocity);
    }

    /// Sample times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Radius at every sample.
    #[must_use]
    pub fn radius(&self) -> &[f64] {
        &self.radius
    }

    /// Wall velocity at every sample.
    #[must_use]
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no samples were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// State at sample `index`.
    #[must_use]
    pub fn state(&self, index: usize) -> Option<State> {
        Some(State::new(
            *self.radius.get(index)?,
            *self.velocity.get(index)?,
        ))
    }

    /// Last recorded state.
    #[must_use]
    pub fn final_state(&self) -> Option<State> {
        self.len().checked_sub(1).and_then(|i| self.state(i))
    }

    /// `R(t) − r0` at every sample.
    #[must_use]
    pub fn radius_deviation(&self, r0: f64) -> Vec<f64> {
        self.radius.iter().map(|r| r - r0).collect()
    }

    /// Smallest radius reached.
    #[must_use]
    pub fn min_radius(&self) -> Option<f64> {
        self.radius.iter().copied().reduce(f64::min)
    }

    /// Largest radius reached.
    #[must_use]
    pub fn max_radius(&self) -> Option<f64> {
        self.radius.iter().copied().reduce(f64::max)
    }

    /// Uniform sample spacing of the recorded times, if any.
    #[must_use]
    pub fn sample_spacing(&self) -> Option<f64> {
        TimeGrid::from_points(self.times.clone())
            .ok()
            .and_then(|g| g.uniform_spacing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_matches_reference_grid() {
        let grid = TimeGrid::linspace(0.0, 5e-6, 5000).unwrap();
        assert_eq!(grid.len(), 5000);
        assert_eq!(grid.start(), 0.0);
        assert_eq!(grid.end(), 5e-6);
        let dt = grid.uniform_spacing().unwrap();
        assert!((dt - 5e-6 / 4999.0).abs() < 1e-21);
    }

    #[test]
    fn linspace_rejects_bad_input() {
        assert!(TimeGrid::linspace(0.0, 1.0, 1).is_err());
        assert!(TimeGrid::linspace(0.0, 1.0, 0).is_err());
        assert!(TimeGrid::linspace(1.0, 1.0, 10).is_err());
        assert!(TimeGrid::linspace(1.0, 0.0, 10).is_err());
        assert!(TimeGrid::linspace(0.0, f64::NAN, 10).is_err());
    }

    #[test]
    fn from_points_rejects_non_monotonic() {
        assert!(TimeGrid::from_points(vec![]).is_err());
        assert!(TimeGrid::from_points(vec![0.0, 1.0, 1.0]).is_err());
        assert!(TimeGrid::from_points(vec![0.0, 2.0, 1.0]).is_err());
        assert!(TimeGrid::from_points(vec![0.0, f64::INFINITY]).is_err());
        assert!(TimeGrid::from_points(vec![0.5]).is_ok());
    }

    #[test]
    fn non_uniform_grid_has_no_spacing() {
        let grid = TimeGrid::from_points(vec![0.0, 1.0, 3.0]).unwrap();
        assert!(grid.uniform_spacing().is_none());
        let single = TimeGrid::from_points(vec![0.0]).unwrap();
        assert!(single.uniform_spacing().is_none());
    }

    #[test]
    fn trajectory_accessors() {
        let mut traj = Trajectory::with_capacity(3);
        traj.push(0.0, State::new(2.0, 0.0));
        traj.push(1.0, State::new(2.5, 1.0));
        traj.push(2.0, State::new(1.5, -1.0));
        assert_eq!(traj.len(), 3);
        assert_eq!(traj.min_radius(), Some(1.5));
        assert_eq!(traj.max_radius(), Some(2.5));
        assert_eq!(traj.final_state(), Some(State::new(1.5, -1.0)));
        assert_eq!(traj.radius_deviation(2.0), vec![0.0, 0.5, -0.5]);
        assert_eq!(traj.sample_spacing(), Some(1.0));
        assert!(traj.state(3).is_none());
    }

    #[test]
    fn empty_trajectory() {
        let traj = Trajectory::with_capacity(0);
        assert!(traj.is_empty());
        assert!(traj.final_state().is_none());
        assert!(traj.min_radius().is_none());
    }
}
