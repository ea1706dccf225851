//! Maze generation and spatial queries
//!
//! The maze is carved once at session start and immutable afterwards. The
//! carve is a randomized depth-first backtracker on a two-cell stride, which
//! yields a perfect spanning tree: exactly one path between any two open
//! cells, no loops. That property matters for gameplay - sonar echoes stay
//! interpretable because corridors never reconnect.

use glam::Vec2;
use rand::Rng;

use crate::cell_center;

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Wall,
}

/// Immutable-after-generation maze grid
#[derive(Debug, Clone)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: (usize, usize),
    exit: (usize, usize),
}

/// Stride-2 carve directions (up, down, left, right)
const CARVE_DIRS: [(i64, i64); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

impl Maze {
    /// Carve a new maze. `width` and `height` must be odd and >= 5 so the
    /// stride-2 lattice lines up with the border ring.
    pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        assert!(
            width >= 5 && height >= 5 && width % 2 == 1 && height % 2 == 1,
            "maze dimensions must be odd and >= 5 (got {width}x{height})"
        );

        let mut maze = Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
            start: (1, 1),
            exit: (width - 2, height - 2),
        };

        // Iterative backtracker: open the start, then repeatedly tunnel to a
        // random still-walled stride-2 neighbor, opening the midpoint cell as
        // the connecting passage. Dead end -> pop.
        let mut stack: Vec<(usize, usize)> = Vec::new();
        maze.set(1, 1, Cell::Open);
        stack.push((1, 1));

        while let Some(&(cx, cy)) = stack.last() {
            let mut candidates: [(usize, usize); 4] = [(0, 0); 4];
            let mut count = 0;

            for (dx, dy) in CARVE_DIRS {
                let nx = cx as i64 + dx;
                let ny = cy as i64 + dy;
                // Interior only - the border ring stays wall forever
                if nx > 0 && nx < maze.width as i64 - 1 && ny > 0 && ny < maze.height as i64 - 1 {
                    let (nx, ny) = (nx as usize, ny as usize);
                    if maze.cells[ny * maze.width + nx] == Cell::Wall {
                        candidates[count] = (nx, ny);
                        count += 1;
                    }
                }
            }

            if count > 0 {
                let (nx, ny) = candidates[rng.random_range(0..count)];
                let (mx, my) = ((cx + nx) / 2, (cy + ny) / 2);
                maze.set(mx, my, Cell::Open);
                maze.set(nx, ny, Cell::Open);
                stack.push((nx, ny));
            } else {
                stack.pop();
            }
        }

        // The exit sits on the carved lattice parity so the backtracker has
        // already reached it; forcing it open guards the pathological case.
        let (ex, ey) = maze.exit;
        maze.set(ex, ey, Cell::Open);

        log::debug!("carved {width}x{height} maze, exit at ({ex}, {ey})");
        maze
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y * self.width + x] = cell;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Start cell (always open)
    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    /// Exit cell (always open)
    pub fn exit(&self) -> (usize, usize) {
        self.exit
    }

    /// World-space center of the start cell
    pub fn start_center(&self) -> Vec2 {
        cell_center(self.start.0, self.start.1)
    }

    /// World-space center of the exit cell
    pub fn exit_center(&self) -> Vec2 {
        cell_center(self.exit.0, self.exit.1)
    }

    /// Wall test on integer cell coordinates. Out of bounds counts as wall,
    /// which makes the grid edge an implicit boundary fence.
    pub fn is_wall_cell(&self, cx: i64, cy: i64) -> bool {
        if cx < 0 || cy < 0 || cx >= self.width as i64 || cy >= self.height as i64 {
            return true;
        }
        self.cells[cy as usize * self.width + cx as usize] == Cell::Wall
    }

    /// Wall test on continuous world coordinates. Callers probe sub-cell
    /// positions (leading-edge collision, raycast marching), so coordinates
    /// are floored to the containing cell.
    pub fn is_wall(&self, x: f32, y: f32) -> bool {
        self.is_wall_cell(x.floor() as i64, y.floor() as i64)
    }

    /// Build a maze from an ASCII layout: '#' is wall, anything else open.
    /// Start is the first open cell, exit the last.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows[0].len();
        let mut cells = Vec::with_capacity(width * height);
        let mut start = None;
        let mut exit = (0, 0);

        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "ragged row {y}");
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    cells.push(Cell::Wall);
                } else {
                    cells.push(Cell::Open);
                    start.get_or_insert((x, y));
                    exit = (x, y);
                }
            }
        }

        Self {
            width,
            height,
            cells,
            start: start.expect("layout has no open cell"),
            exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn carve(width: usize, height: usize, seed: u64) -> Maze {
        let mut rng = Pcg32::seed_from_u64(seed);
        Maze::generate(width, height, &mut rng)
    }

    /// Flood fill from the start cell over 4-connected open cells
    fn reachable(maze: &Maze) -> Vec<bool> {
        let (w, h) = (maze.width(), maze.height());
        let mut seen = vec![false; w * h];
        let mut queue = vec![maze.start()];
        seen[maze.start().1 * w + maze.start().0] = true;

        while let Some((x, y)) = queue.pop() {
            for (dx, dy) in [(0i64, -1i64), (0, 1), (-1, 0), (1, 0)] {
                let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                if !maze.is_wall_cell(nx, ny) && !seen[ny as usize * w + nx as usize] {
                    seen[ny as usize * w + nx as usize] = true;
                    queue.push((nx as usize, ny as usize));
                }
            }
        }
        seen
    }

    fn assert_fully_connected(maze: &Maze) {
        let seen = reachable(maze);
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                if !maze.is_wall_cell(x as i64, y as i64) {
                    assert!(seen[y * maze.width() + x], "open cell ({x}, {y}) unreachable");
                }
            }
        }
    }

    #[test]
    fn test_every_open_cell_reachable() {
        assert_fully_connected(&carve(15, 15, 42));
    }

    #[test]
    fn test_border_is_wall() {
        let maze = carve(15, 15, 7);
        for x in 0..15 {
            assert!(maze.is_wall_cell(x, 0));
            assert!(maze.is_wall_cell(x, 14));
        }
        for y in 0..15 {
            assert!(maze.is_wall_cell(0, y));
            assert!(maze.is_wall_cell(14, y));
        }
    }

    #[test]
    fn test_start_and_exit_open() {
        for seed in 0..20 {
            let maze = carve(15, 15, seed);
            assert!(!maze.is_wall_cell(1, 1));
            assert!(!maze.is_wall_cell(13, 13));
        }
    }

    #[test]
    fn test_minimum_size() {
        let maze = carve(5, 5, 3);
        assert_fully_connected(&maze);
        assert_eq!(maze.exit(), (3, 3));
        assert!(!maze.is_wall_cell(3, 3));
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = carve(15, 15, 12345);
        let b = carve(15, 15, 12345);
        assert_eq!(a.cells, b.cells);
    }

    #[test]
    fn test_different_seed_different_grid() {
        let a = carve(15, 15, 1);
        let b = carve(15, 15, 2);
        assert_ne!(a.cells, b.cells);
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let maze = carve(5, 5, 0);
        assert!(maze.is_wall(-0.5, 1.5));
        assert!(maze.is_wall(1.5, -0.5));
        assert!(maze.is_wall(5.5, 1.5));
        assert!(maze.is_wall(1.5, 100.0));
    }

    #[test]
    fn test_continuous_coordinates_floor_to_cell() {
        let maze = carve(5, 5, 0);
        // (1,1) is the open start cell; every sub-cell position inside it agrees
        assert!(!maze.is_wall(1.05, 1.05));
        assert!(!maze.is_wall(1.5, 1.5));
        assert!(!maze.is_wall(1.95, 1.95));
        // (0,0) is border wall
        assert!(maze.is_wall(0.5, 0.5));
    }

    proptest! {
        #[test]
        fn prop_connectivity_and_border(half_w in 2usize..10, half_h in 2usize..10, seed: u64) {
            let (w, h) = (half_w * 2 + 1, half_h * 2 + 1);
            let maze = carve(w, h, seed);

            assert_fully_connected(&maze);

            for x in 0..w as i64 {
                prop_assert!(maze.is_wall_cell(x, 0));
                prop_assert!(maze.is_wall_cell(x, h as i64 - 1));
            }
            for y in 0..h as i64 {
                prop_assert!(maze.is_wall_cell(0, y));
                prop_assert!(maze.is_wall_cell(w as i64 - 1, y));
            }

            prop_assert!(!maze.is_wall_cell(maze.exit().0 as i64, maze.exit().1 as i64));
        }
    }
}
