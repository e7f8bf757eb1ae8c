pub mod dense;

pub use dense::DenseGrid;

use maze_common::geom::coord::GridCoord;

/// Obstacle storage seam between the grid and the search. Read-only during
/// a routing pass; there is no obstacle removal.
pub trait RoutingGrid: Sync + Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn layers(&self) -> u8;

    /// Blocks a cell. Out-of-bounds coordinates are a silent no-op.
    fn mark_obstacle(&mut self, coord: GridCoord);

    fn is_obstacle(&self, coord: GridCoord) -> bool;
    fn in_bounds(&self, coord: GridCoord) -> bool;
}
