//! Right-hand wall-following boundary tracer.
//!
//! The follower keeps one hand on the obstruction while walking around it.
//! Its state is the current obstructed pixel plus a heading that points from
//! that pixel to a free neighbour. Each step tries, in order:
//!
//! 1. the diagonal `pixel + forward + right`: an outer corner, turn left;
//! 2. the side `pixel + right`: a straight wall, keep the heading;
//! 3. nothing: an inner corner, pivot the heading to the right in place.
//!
//! The trace is complete when the initial state recurs.

use crate::raster::{OccupancyGrid, PixelPos};
use crate::types::Contour;

/// Position and heading of the wall follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracerState {
    /// Obstructed pixel the follower is touching.
    pub pixel: PixelPos,
    /// Unit step from `pixel` towards the free side.
    pub forward: PixelPos,
}

impl TracerState {
    pub fn free_pixel(&self) -> PixelPos {
        self.pixel + self.forward
    }
}

/// Transition taken by a single tracer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracerMove {
    /// Moved diagonally around an outer corner.
    Corner,
    /// Moved sideways along a straight wall.
    Straight,
    /// Stayed in place and turned right.
    Pivot,
}

/// Wall follower over an occupancy grid.
#[derive(Debug, Clone)]
pub struct WallFollower<'a> {
    grid: &'a OccupancyGrid,
    state: TracerState,
}

impl<'a> WallFollower<'a> {
    pub fn new(grid: &'a OccupancyGrid, free: PixelPos, obstructed: PixelPos) -> Self {
        debug_assert!(!grid.is_occupied(free), "trace must start from a free pixel");
        debug_assert!(grid.is_occupied(obstructed), "trace must start at an obstruction");
        Self {
            grid,
            state: TracerState {
                pixel: obstructed,
                forward: free - obstructed,
            },
        }
    }

    pub fn state(&self) -> TracerState {
        self.state
    }

    /// Advances by one transition.
    ///
    /// Returns `None` when a candidate pixel lies outside the grid, which
    /// means the obstruction is not closed within the raster.
    pub fn step(&mut self) -> Option<TracerMove> {
        let TracerState { pixel, forward } = self.state;
        let right = forward.rotate_right();
        let corner = pixel + forward + right;
        let side = pixel + right;
        if !self.grid.contains(corner) || !self.grid.contains(side) {
            return None;
        }

        if self.grid.is_occupied(corner) {
            self.state = TracerState { pixel: corner, forward: -right };
            Some(TracerMove::Corner)
        } else if self.grid.is_occupied(side) {
            self.state.pixel = side;
            Some(TracerMove::Straight)
        } else {
            self.state.forward = right;
            Some(TracerMove::Pivot)
        }
    }
}

/// A closed boundary and whether it surrounds the pixel the trace began on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedBoundary {
    pub contour: Contour,
    pub encloses_start: bool,
}

/// Traces the obstruction touching `free` on its right side.
///
/// `obstructed` must be the occupied right-hand neighbour of `free`. Returns
/// `None` if the trace leaves the grid or does not close within
/// `width * height` steps.
pub fn trace_boundary(grid: &OccupancyGrid, free: PixelPos, obstructed: PixelPos) -> Option<TracedBoundary> {
    let mut follower = WallFollower::new(grid, free, obstructed);
    let initial = follower.state();
    let max_steps = grid.width() as usize * grid.height() as usize;

    let mut points = Vec::with_capacity(4096.min(max_steps));
    points.push(obstructed);

    for _ in 0..max_steps {
        follower.step()?;
        let state = follower.state();
        if state == initial {
            // The walk may re-enter the start pixel before the final pivot.
            if points.len() > 1 && points.first() == points.last() {
                points.pop();
            }
            let contour = Contour { points };
            let encloses_start = contour.contains(free);
            return Some(TracedBoundary { contour, encloses_start });
        }
        if points.last() != Some(&state.pixel) {
            points.push(state.pixel);
        }
    }
    None
}
