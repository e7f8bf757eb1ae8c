use super::RoutingGrid;
use maze_common::geom::coord::GridCoord;

pub const LAYERS: u8 = 2;

/// Flat-vector occupancy grid, one bool per cell across both layers.
pub struct DenseGrid {
    width: u32,
    height: u32,
    obstacles: Vec<bool>,
}

impl DenseGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * (LAYERS as usize);

        if size > 500_000_000 {
            log::warn!(
                "Allocating large DenseGrid: {} cells. Ensure sufficient RAM.",
                size
            );
        }

        Self {
            width,
            height,
            obstacles: vec![false; size],
        }
    }

    #[inline(always)]
    pub fn index(&self, coord: GridCoord) -> usize {
        (coord.z as usize) * (self.width as usize) * (self.height as usize)
            + (coord.y as usize) * (self.width as usize)
            + (coord.x as usize)
    }

    #[inline(always)]
    pub fn coord(&self, idx: usize) -> GridCoord {
        let plane = (self.width as usize) * (self.height as usize);
        let z = (idx / plane) as u8;
        let rem = idx % plane;
        GridCoord::new(
            (rem % self.width as usize) as u32,
            (rem / self.width as usize) as u32,
            z,
        )
    }

    pub fn num_cells(&self) -> usize {
        self.obstacles.len()
    }
}

impl RoutingGrid for DenseGrid {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn layers(&self) -> u8 {
        LAYERS
    }

    fn mark_obstacle(&mut self, coord: GridCoord) {
        if !self.in_bounds(coord) {
            return;
        }
        let idx = self.index(coord);
        self.obstacles[idx] = true;
    }

    fn is_obstacle(&self, coord: GridCoord) -> bool {
        if !self.in_bounds(coord) {
            return true;
        }
        self.obstacles[self.index(coord)]
    }

    fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x < self.width && coord.y < self.height && coord.z < LAYERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_fully_free() {
        let grid = DenseGrid::new(4, 3);
        assert_eq!(grid.num_cells(), 24);
        for idx in 0..grid.num_cells() {
            assert!(!grid.is_obstacle(grid.coord(idx)));
        }
    }

    #[test]
    fn mark_and_query_obstacle() {
        let mut grid = DenseGrid::new(4, 4);
        grid.mark_obstacle(GridCoord::new(2, 1, 1));
        assert!(grid.is_obstacle(GridCoord::new(2, 1, 1)));
        assert!(!grid.is_obstacle(GridCoord::new(2, 1, 0)));
    }

    #[test]
    fn out_of_bounds_mark_is_a_noop() {
        let mut grid = DenseGrid::new(4, 4);
        grid.mark_obstacle(GridCoord::new(9, 9, 0));
        grid.mark_obstacle(GridCoord::new(0, 0, 2));
        for idx in 0..grid.num_cells() {
            assert!(!grid.is_obstacle(grid.coord(idx)));
        }
    }

    #[test]
    fn out_of_bounds_reads_as_blocked() {
        let grid = DenseGrid::new(4, 4);
        assert!(grid.is_obstacle(GridCoord::new(4, 0, 0)));
        assert!(grid.is_obstacle(GridCoord::new(0, 0, 2)));
        assert!(!grid.in_bounds(GridCoord::new(0, 4, 1)));
    }

    #[test]
    fn index_roundtrip() {
        let grid = DenseGrid::new(5, 7);
        let c = GridCoord::new(3, 6, 1);
        assert_eq!(grid.coord(grid.index(c)), c);
    }
}
