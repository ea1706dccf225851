//! Discrete-step raycasting for sonar
//!
//! Marches a ray through the grid in fixed 0.5-unit increments. Direction
//! vectors are used as given - the intercardinal sonar rays use (0.7, 0.7)
//! style vectors, so their effective step length differs slightly from the
//! cardinal rays. That matches the feel the pitch feedback is tuned against.

use glam::Vec2;

use super::maze::Maze;
use crate::consts::RAY_STEP;

/// Result of a single directional cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub hit: bool,
    /// Distance marched before the step that detected the wall. One step
    /// short of the probe position by convention; callers map this to ping
    /// pitch, so the convention is load-bearing.
    pub distance: f32,
    /// Probe position at termination (inside the wall cell on a hit)
    pub point: Vec2,
}

/// The eight fixed sonar directions: compass cardinals plus intercardinals
pub const SONAR_DIRECTIONS: [Vec2; 8] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(0.7, 0.7),
    Vec2::new(0.7, -0.7),
    Vec2::new(-0.7, 0.7),
    Vec2::new(-0.7, -0.7),
];

/// March from `origin` along `dir`, testing the grid after each advance.
/// Terminates with `hit: false` and `distance == max_distance` if no wall is
/// found in range. Stateless - concurrent casts never interfere.
pub fn raycast(maze: &Maze, origin: Vec2, dir: Vec2, max_distance: f32) -> RaycastHit {
    let mut dist = 0.0;
    let mut pos = origin;

    while dist < max_distance {
        pos += dir * RAY_STEP;
        if maze.is_wall(pos.x, pos.y) {
            return RaycastHit {
                hit: true,
                distance: dist,
                point: pos,
            };
        }
        dist += RAY_STEP;
    }

    RaycastHit {
        hit: false,
        distance: max_distance,
        point: pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_reports_exact_max_distance() {
        // 21-wide corridor: nothing to hit within 8 units of the left end
        let maze = Maze::from_rows(&[
            "#####################",
            "#...................#",
            "#####################",
        ]);
        let hit = raycast(&maze, Vec2::new(1.5, 1.5), Vec2::new(1.0, 0.0), 8.0);
        assert!(!hit.hit);
        assert_eq!(hit.distance, 8.0);
    }

    #[test]
    fn test_hit_distance_is_pre_increment() {
        // Wall cell at x=3: probes at 1.0, 1.5, 2.0, 2.5 pass, probe at 3.0
        // lands in the wall. Reported distance is the accumulation *before*
        // the hitting step: 2.0.
        let maze = Maze::from_rows(&[
            "#####",
            "...#.",
            "#####",
        ]);
        let hit = raycast(&maze, Vec2::new(0.5, 1.5), Vec2::new(1.0, 0.0), 8.0);
        assert!(hit.hit);
        assert_eq!(hit.distance, 2.0);
        assert_eq!(hit.point, Vec2::new(3.0, 1.5));
    }

    #[test]
    fn test_first_step_hit_reports_zero() {
        let maze = Maze::from_rows(&[
            "###",
            ".#.",
            "###",
        ]);
        let hit = raycast(&maze, Vec2::new(0.9, 1.5), Vec2::new(1.0, 0.0), 8.0);
        assert!(hit.hit);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_all_sonar_directions_hit_in_closed_room() {
        let maze = Maze::from_rows(&[
            "#####",
            "#...#",
            "#...#",
            "#...#",
            "#####",
        ]);
        let center = Vec2::new(2.5, 2.5);
        for dir in SONAR_DIRECTIONS {
            let hit = raycast(&maze, center, dir, 8.0);
            assert!(hit.hit, "ray {dir:?} should hit a wall");
            assert!(hit.distance < 3.0);
        }
    }

    #[test]
    fn test_ray_escapes_through_doorway() {
        let maze = Maze::from_rows(&[
            "#####",
            "#...#",
            "#.#.#",
            "#...#",
            "#####",
        ]);
        // Straight down the open column, out of range before the far wall
        let hit = raycast(&maze, Vec2::new(1.5, 1.2), Vec2::new(0.0, 1.0), 2.0);
        assert!(!hit.hit);
        assert_eq!(hit.distance, 2.0);
    }
}
