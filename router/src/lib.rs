pub mod algo;
pub mod error;
pub mod grid;
pub mod net_router;
pub mod scheduler;

pub use error::RouteError;
pub use scheduler::RouteMetrics;

use maze_common::db::core::RouteDB;
use maze_common::util::config::RoutingConfig;

/// Routes every net in the database and writes paths and costs back onto
/// it. Always completes; individual nets that exhaust their retries are
/// left unrouted.
pub fn route(db: &mut RouteDB, config: &RoutingConfig) -> RouteMetrics {
    scheduler::run(db, config)
}
