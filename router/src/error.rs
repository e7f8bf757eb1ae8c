use maze_common::geom::coord::GridCoord;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("net must have at least two pins")]
    InsufficientPins,

    #[error("no valid path found from {from} to {to}")]
    NoPath { from: GridCoord, to: GridCoord },
}
