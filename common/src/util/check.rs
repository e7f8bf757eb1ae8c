use crate::db::core::{NetData, RouteDB};
use crate::geom::coord::GridCoord;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Verifies every routed path against the grid geometry: unit-step
/// contiguity, obstacle avoidance, bounds, and the per-layer routing
/// direction (layer 0 horizontal, layer 1 vertical).
pub fn run(db: &RouteDB) -> Result<(), String> {
    log::info!("Starting Routing Verification...");

    let blocked: HashSet<GridCoord> = db
        .obstacles
        .iter()
        .copied()
        .filter(|c| c.x < db.width && c.y < db.height && c.z < 2)
        .collect();

    let valid = AtomicBool::new(true);

    db.nets.par_iter().for_each(|net| {
        if !net.is_routed() {
            return;
        }
        if let Err(msg) = check_net(net, db, &blocked) {
            log::error!("FAIL: Net '{}': {}", net.name, msg);
            valid.store(false, Ordering::Relaxed);
        }
    });

    if valid.load(Ordering::Relaxed) {
        log::info!("\x1b[32mPASS\x1b[0m: All routed paths are geometrically valid.");
        Ok(())
    } else {
        Err("Routing verification failed.".to_string())
    }
}

fn check_net(net: &NetData, db: &RouteDB, blocked: &HashSet<GridCoord>) -> Result<(), String> {
    for &c in &net.path {
        if c.x >= db.width || c.y >= db.height || c.z >= 2 {
            return Err(format!("cell {} out of bounds", c));
        }
        if blocked.contains(&c) {
            return Err(format!("cell {} is an obstacle", c));
        }
    }

    for w in net.path.windows(2) {
        let (a, b) = (w[0], w[1]);
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        let dz = a.z.abs_diff(b.z) as u32;
        if dx + dy + dz != 1 {
            return Err(format!("step {} -> {} is not a unit move", a, b));
        }
        if dz == 0 {
            // Non-via steps must follow the layer's preferred direction.
            if a.z == 0 && dy != 0 {
                return Err(format!("vertical step {} -> {} on layer 0", a, b));
            }
            if a.z == 1 && dx != 0 {
                return Err(format!("horizontal step {} -> {} on layer 1", a, b));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_path(path: Vec<GridCoord>) -> RouteDB {
        let mut db = RouteDB::new(8, 8, 0, 0);
        let id = db.add_net("net1".to_string());
        db.nets[id.index()].pins = vec![path[0], *path.last().unwrap()];
        db.nets[id.index()].path = path;
        db
    }

    #[test]
    fn accepts_valid_two_layer_path() {
        let db = db_with_path(vec![
            GridCoord::new(0, 0, 0),
            GridCoord::new(1, 0, 0),
            GridCoord::new(1, 0, 1),
            GridCoord::new(1, 1, 1),
        ]);
        assert!(run(&db).is_ok());
    }

    #[test]
    fn rejects_wrong_direction_on_layer0() {
        let db = db_with_path(vec![GridCoord::new(0, 0, 0), GridCoord::new(0, 1, 0)]);
        assert!(run(&db).is_err());
    }

    #[test]
    fn rejects_path_through_obstacle() {
        let mut db = db_with_path(vec![GridCoord::new(0, 0, 0), GridCoord::new(1, 0, 0)]);
        db.obstacles.push(GridCoord::new(1, 0, 0));
        assert!(run(&db).is_err());
    }

    #[test]
    fn rejects_non_unit_step() {
        let db = db_with_path(vec![GridCoord::new(0, 0, 0), GridCoord::new(2, 0, 0)]);
        assert!(run(&db).is_err());
    }

    #[test]
    fn unrouted_nets_are_ignored() {
        let mut db = RouteDB::new(4, 4, 0, 0);
        db.add_net("floating".to_string());
        assert!(run(&db).is_ok());
    }
}
