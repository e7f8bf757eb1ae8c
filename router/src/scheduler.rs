use crate::algo::wavefront::{Penalties, Wavefront};
use crate::grid::{DenseGrid, RoutingGrid};
use crate::net_router;
use maze_common::db::core::{NetData, RouteDB};
use maze_common::geom::coord::GridCoord;
use maze_common::util::config::RoutingConfig;
use rayon::prelude::*;
use std::time::Instant;

/// Per-net routing state. A failed attempt degrades through the bounded
/// pruning retries; every transition is driven by [`NetState::on_failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetState {
    Scheduled,
    Routing,
    RetryDropFirst,
    RetryDropSecond,
    RetryDropLast,
    Routed,
    Unroutable,
}

impl NetState {
    /// Next state after a failed attempt. Retries always prune against the
    /// original pin list: full chain, minus first, minus second, minus
    /// last, then unroutable.
    pub fn on_failure(self, pin_count: usize) -> NetState {
        match self {
            NetState::Scheduled | NetState::Routing => {
                if pin_count > 2 {
                    NetState::RetryDropFirst
                } else {
                    NetState::RetryDropLast
                }
            }
            NetState::RetryDropFirst => NetState::RetryDropSecond,
            NetState::RetryDropSecond => NetState::RetryDropLast,
            _ => NetState::Unroutable,
        }
    }

    /// Pin subset attempted in this state.
    pub fn attempt_pins(self, pins: &[GridCoord]) -> Vec<GridCoord> {
        match self {
            NetState::Scheduled | NetState::Routing => pins.to_vec(),
            NetState::RetryDropFirst => pins[1..].to_vec(),
            NetState::RetryDropSecond => {
                let mut subset = pins.to_vec();
                subset.remove(1);
                subset
            }
            NetState::RetryDropLast => pins[..pins.len() - 1].to_vec(),
            _ => Vec::new(),
        }
    }
}

pub struct NetOutcome {
    pub state: NetState,
    pub path: Vec<GridCoord>,
    pub cost: u64,
}

/// Aggregate metrics over the routed nets of a batch. Unroutable nets are
/// excluded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouteMetrics {
    pub routed: usize,
    pub unroutable: usize,
    pub longest_route: usize,
    pub total_wire_length: usize,
    pub total_vias: usize,
}

/// Sort key for the batch: fewer pins first, then shorter Manhattan span
/// over consecutive pins (layer ignored).
pub fn priority_key(net: &NetData) -> (usize, u32) {
    let span = net
        .pins
        .windows(2)
        .map(|w| w[0].manhattan(w[1]))
        .sum::<u32>();
    (net.pins.len(), span)
}

/// Routes every net in the database in priority order, applying the
/// pruning retry policy per net, and writes paths and costs back. The
/// batch never aborts because of one net.
pub fn run(db: &mut RouteDB, config: &RoutingConfig) -> RouteMetrics {
    let start = Instant::now();

    let mut grid = DenseGrid::new(db.width, db.height);
    for &c in &db.obstacles {
        grid.mark_obstacle(c);
    }

    let mut order: Vec<usize> = (0..db.num_nets()).collect();
    order.sort_by_key(|&i| priority_key(&db.nets[i]));

    let penalties = Penalties {
        bend: db.bend_penalty,
        via: db.via_penalty,
    };

    log::info!(
        "Scheduling {} nets on a {}x{}x2 grid ({} obstacles)...",
        db.num_nets(),
        db.width,
        db.height,
        db.obstacles.len()
    );

    // The grid is read-only from here on and routed paths are never
    // written back into it, so per-net searches are independent. Results
    // are collected in priority order, keeping the batch deterministic.
    let nets = &db.nets;
    let outcomes: Vec<(usize, NetOutcome)> = if config.parallel {
        order
            .par_iter()
            .map_with(Wavefront::new(), |solver, &net_id| {
                (
                    net_id,
                    route_with_recovery(&grid, solver, &nets[net_id], penalties),
                )
            })
            .collect()
    } else {
        let mut solver = Wavefront::new();
        order
            .iter()
            .map(|&net_id| {
                (
                    net_id,
                    route_with_recovery(&grid, &mut solver, &nets[net_id], penalties),
                )
            })
            .collect()
    };

    let mut metrics = RouteMetrics::default();
    for (net_id, outcome) in outcomes {
        let net = &mut db.nets[net_id];
        match outcome.state {
            NetState::Routed => {
                net.path = outcome.path;
                net.cost = outcome.cost;
                log::info!("{} routed with cost: {}", net.name, net.cost);
                metrics.routed += 1;
                metrics.total_wire_length += net.wire_length();
                metrics.total_vias += net.via_count();
                metrics.longest_route = metrics.longest_route.max(net.wire_length());
            }
            _ => {
                log::warn!("{} is unroutable.", net.name);
                metrics.unroutable += 1;
            }
        }
    }

    log::info!(
        "Routing Metrics: {} routed, {} unroutable, longest route {} edges, total wire length {}, total vias {} ({}ms)",
        metrics.routed,
        metrics.unroutable,
        metrics.longest_route,
        metrics.total_wire_length,
        metrics.total_vias,
        start.elapsed().as_millis()
    );

    metrics
}

fn route_with_recovery<G: RoutingGrid + ?Sized>(
    grid: &G,
    solver: &mut Wavefront,
    net: &NetData,
    penalties: Penalties,
) -> NetOutcome {
    let unroutable = || NetOutcome {
        state: NetState::Unroutable,
        path: Vec::new(),
        cost: 0,
    };

    if net.pins.len() < 2 {
        log::warn!("Net '{}' has fewer than two pins.", net.name);
        return unroutable();
    }

    let mut state = NetState::Routing;
    loop {
        let pins = state.attempt_pins(&net.pins);
        if pins.len() < 2 {
            log::warn!(
                "Not enough pins to route net {} after removing isolated pins.",
                net.name
            );
            return unroutable();
        }

        match net_router::route_net(grid, solver, &pins, penalties) {
            Ok((path, cost)) => {
                return NetOutcome {
                    state: NetState::Routed,
                    path,
                    cost,
                };
            }
            Err(e) => {
                log::warn!("Failed to route {} in {:?}: {}", net.name, state, e);
                state = state.on_failure(net.pins.len());
                if state == NetState::Unroutable {
                    return unroutable();
                }
            }
        }
    }
}
