use crate::error::RouteError;
use crate::grid::RoutingGrid;
use maze_common::geom::coord::GridCoord;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Per-move penalties on top of the base step cost of 1. A via move costs
/// `via` in total (base plus `via - 1`); a bend adds `bend` whenever a
/// move's direction differs from the last direction recorded for the cell
/// being left. The bend rule is applied uniformly to every move, vias
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Penalties {
    pub bend: u32,
    pub via: u32,
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: u64,
    index: u32,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on cost; equal costs settled by cell index so path
        // shapes are reproducible.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fixed expansion order: +x, -x, +y, -y, +layer, -layer.
const DIRECTIONS: [(i64, i64, i64); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

const NO_DIR: u8 = u8::MAX;

/// Dijkstra-style wavefront over both layers. Scratch arrays are sized to
/// the grid and reused across calls via a generation tag, so a solver can
/// route many segments without reallocating.
#[derive(Clone)]
pub struct Wavefront {
    dist: Vec<u64>,
    parents: Vec<u32>,
    last_dir: Vec<u8>,
    visited_tag: Vec<u32>,
    current_tag: u32,
    capacity: usize,
}

impl Wavefront {
    pub fn new() -> Self {
        let cap = 65_536;
        Self {
            dist: vec![u64::MAX; cap],
            parents: vec![u32::MAX; cap],
            last_dir: vec![NO_DIR; cap],
            visited_tag: vec![0; cap],
            current_tag: 1,
            capacity: cap,
        }
    }

    fn ensure_capacity(&mut self, size: usize) {
        if size > self.capacity {
            self.capacity = size.max(self.capacity * 2);
            self.dist.resize(self.capacity, u64::MAX);
            self.parents.resize(self.capacity, u32::MAX);
            self.last_dir.resize(self.capacity, NO_DIR);
            self.visited_tag.resize(self.capacity, 0);
        }
    }

    fn reset(&mut self) {
        self.current_tag += 1;
        if self.current_tag == 0 {
            self.visited_tag.fill(0);
            self.current_tag = 1;
        }
    }

    /// Finds the minimum-cost path between two cells, or fails with
    /// [`RouteError::NoPath`] carrying both endpoints.
    pub fn find_path<G: RoutingGrid + ?Sized>(
        &mut self,
        grid: &G,
        source: GridCoord,
        target: GridCoord,
        penalties: Penalties,
    ) -> Result<(Vec<GridCoord>, u64), RouteError> {
        let width = grid.width() as usize;
        let height = grid.height() as usize;
        self.ensure_capacity(width * height * grid.layers() as usize);
        self.reset();

        let index_of = |c: GridCoord| -> usize {
            (c.z as usize) * width * height + (c.y as usize) * width + (c.x as usize)
        };

        let source_idx = index_of(source);
        let target_idx = index_of(target);
        self.dist[source_idx] = 0;
        self.parents[source_idx] = u32::MAX;
        self.last_dir[source_idx] = NO_DIR;
        self.visited_tag[source_idx] = self.current_tag;

        let mut heap = BinaryHeap::new();
        heap.push(State {
            cost: 0,
            index: source_idx as u32,
        });

        while let Some(State { cost, index }) = heap.pop() {
            let curr_idx = index as usize;
            if cost > self.dist[curr_idx] {
                continue;
            }
            if curr_idx == target_idx {
                // Popped in non-decreasing cost order, so the target's
                // distance is final here.
                return Ok((self.reconstruct_path(target_idx, width, height), cost));
            }

            let position = coord_of(curr_idx, width, height);
            let curr_dir = self.last_dir[curr_idx];

            for (dir, &(dx, dy, dz)) in DIRECTIONS.iter().enumerate() {
                let nx = position.x as i64 + dx;
                let ny = position.y as i64 + dy;
                let nz = position.z as i64 + dz;
                if nx < 0 || ny < 0 || nz < 0 {
                    continue;
                }
                let neighbor = GridCoord::new(nx as u32, ny as u32, nz as u8);
                if !grid.in_bounds(neighbor) {
                    continue;
                }

                // Layer 0 routes horizontally, layer 1 vertically. Vias
                // are exempt.
                if dz == 0 {
                    if position.z == 0 && dy != 0 {
                        continue;
                    }
                    if position.z == 1 && dx != 0 {
                        continue;
                    }
                }

                if grid.is_obstacle(neighbor) {
                    continue;
                }

                let mut move_cost: u64 = if dz != 0 { penalties.via as u64 } else { 1 };
                if curr_dir != NO_DIR && curr_dir != dir as u8 {
                    move_cost += penalties.bend as u64;
                }

                let candidate = self.dist[curr_idx] + move_cost;
                let neighbor_idx = index_of(neighbor);
                let known = if self.visited_tag[neighbor_idx] == self.current_tag {
                    self.dist[neighbor_idx]
                } else {
                    u64::MAX
                };

                if candidate < known {
                    self.dist[neighbor_idx] = candidate;
                    self.parents[neighbor_idx] = curr_idx as u32;
                    self.last_dir[neighbor_idx] = dir as u8;
                    self.visited_tag[neighbor_idx] = self.current_tag;
                    heap.push(State {
                        cost: candidate,
                        index: neighbor_idx as u32,
                    });
                }
            }
        }

        Err(RouteError::NoPath {
            from: source,
            to: target,
        })
    }

    fn reconstruct_path(&self, target_idx: usize, width: usize, height: usize) -> Vec<GridCoord> {
        let mut path = Vec::new();
        let mut curr = target_idx;
        loop {
            path.push(coord_of(curr, width, height));
            let parent = self.parents[curr];
            if parent == u32::MAX {
                break;
            }
            curr = parent as usize;
        }
        path.reverse();
        path
    }
}

impl Default for Wavefront {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn coord_of(idx: usize, width: usize, height: usize) -> GridCoord {
    let plane = width * height;
    GridCoord::new(
        (idx % plane % width) as u32,
        (idx % plane / width) as u32,
        (idx / plane) as u8,
    )
}
