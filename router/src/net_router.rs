use crate::algo::wavefront::{Penalties, Wavefront};
use crate::error::RouteError;
use crate::grid::RoutingGrid;
use maze_common::geom::coord::GridCoord;

/// Routes a multi-pin net as a chain of point-to-point segments through the
/// pins in order. Sub-paths are stitched by dropping the duplicated
/// junction cell; costs are summed. The first failing segment aborts the
/// net and carries its endpoints.
///
/// Pins are clamped into the grid (layer into {0,1}) as a silent repair,
/// never an error.
pub fn route_net<G: RoutingGrid + ?Sized>(
    grid: &G,
    solver: &mut Wavefront,
    pins: &[GridCoord],
    penalties: Penalties,
) -> Result<(Vec<GridCoord>, u64), RouteError> {
    if pins.len() < 2 {
        return Err(RouteError::InsufficientPins);
    }

    let pins: Vec<GridCoord> = pins.iter().map(|&p| clamp_pin(grid, p)).collect();

    let mut full_path: Vec<GridCoord> = Vec::new();
    let mut total_cost = 0u64;

    for pair in pins.windows(2) {
        let (path, cost) = solver.find_path(grid, pair[0], pair[1], penalties)?;
        if full_path.is_empty() {
            full_path.extend(path);
        } else {
            full_path.extend(path.into_iter().skip(1));
        }
        total_cost += cost;
    }

    Ok((full_path, total_cost))
}

fn clamp_pin<G: RoutingGrid + ?Sized>(grid: &G, pin: GridCoord) -> GridCoord {
    GridCoord::new(
        pin.x.min(grid.width() - 1),
        pin.y.min(grid.height() - 1),
        pin.z.min(grid.layers() - 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DenseGrid;

    const FREE: Penalties = Penalties { bend: 0, via: 0 };

    #[test]
    fn single_pin_net_is_insufficient() {
        let grid = DenseGrid::new(4, 4);
        let err = route_net(
            &grid,
            &mut Wavefront::new(),
            &[GridCoord::new(0, 0, 0)],
            FREE,
        )
        .unwrap_err();
        assert_eq!(err, RouteError::InsufficientPins);
    }

    #[test]
    fn junction_cells_are_not_duplicated() {
        let grid = DenseGrid::new(8, 8);
        let pins = [
            GridCoord::new(0, 0, 0),
            GridCoord::new(3, 0, 0),
            GridCoord::new(6, 0, 0),
        ];
        let (path, cost) = route_net(&grid, &mut Wavefront::new(), &pins, FREE).unwrap();
        assert_eq!(cost, 6);
        assert_eq!(path.len(), 7);
        assert_eq!(path[0], pins[0]);
        assert_eq!(*path.last().unwrap(), pins[2]);
        // Every cell appears once along the straight chain.
        for w in path.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn out_of_range_pins_are_clamped() {
        let grid = DenseGrid::new(5, 5);
        let pins = [GridCoord::new(0, 0, 0), GridCoord::new(40, 0, 9)];
        let (path, _) = route_net(&grid, &mut Wavefront::new(), &pins, FREE).unwrap();
        // (40,0,9) repairs to (4,0,1).
        assert_eq!(*path.last().unwrap(), GridCoord::new(4, 0, 1));
    }

    #[test]
    fn failing_segment_aborts_with_its_endpoints() {
        let mut grid = DenseGrid::new(5, 5);
        // Wall off x=3 on both layers so the last segment is unreachable.
        for y in 0..5 {
            for z in 0..2u8 {
                grid.mark_obstacle(GridCoord::new(3, y, z));
            }
        }
        let pins = [
            GridCoord::new(0, 0, 0),
            GridCoord::new(2, 0, 0),
            GridCoord::new(4, 0, 0),
        ];
        let err = route_net(&grid, &mut Wavefront::new(), &pins, FREE).unwrap_err();
        assert_eq!(
            err,
            RouteError::NoPath {
                from: GridCoord::new(2, 0, 0),
                to: GridCoord::new(4, 0, 0),
            }
        );
    }

    #[test]
    fn cost_equals_sum_of_segment_costs() {
        let grid = DenseGrid::new(8, 8);
        let pens = Penalties { bend: 1, via: 4 };
        let pins = [
            GridCoord::new(0, 0, 0),
            GridCoord::new(4, 0, 0),
            GridCoord::new(4, 3, 0),
        ];
        let mut solver = Wavefront::new();
        let (_, chained) = route_net(&grid, &mut solver, &pins, pens).unwrap();
        let (_, a) = solver.find_path(&grid, pins[0], pins[1], pens).unwrap();
        let (_, b) = solver.find_path(&grid, pins[1], pins[2], pens).unwrap();
        assert_eq!(chained, a + b);
    }
}
