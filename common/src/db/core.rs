use crate::db::indices::NetId;
use crate::geom::coord::GridCoord;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct NetData {
    pub name: String,
    pub pins: Vec<GridCoord>,
    /// Filled in by the router. Empty means the net was not routed.
    pub path: Vec<GridCoord>,
    pub cost: u64,
}

impl NetData {
    pub fn is_routed(&self) -> bool {
        !self.path.is_empty()
    }

    /// Routed wire length in grid edges.
    pub fn wire_length(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Number of layer changes along the routed path.
    pub fn via_count(&self) -> usize {
        self.path.windows(2).filter(|w| w[0].z != w[1].z).count()
    }
}

/// Central design database: the grid description, obstacle set, and nets.
///
/// Obstacles and penalties are fixed once parsing is done; the router only
/// writes back `path` and `cost` on each [`NetData`].
pub struct RouteDB {
    pub width: u32,
    pub height: u32,
    pub bend_penalty: u32,
    pub via_penalty: u32,

    pub obstacles: Vec<GridCoord>,
    pub nets: Vec<NetData>,
    pub net_name_map: HashMap<String, NetId>,
}

impl RouteDB {
    pub fn new(width: u32, height: u32, bend_penalty: u32, via_penalty: u32) -> Self {
        Self {
            width,
            height,
            bend_penalty,
            via_penalty,
            obstacles: Vec::new(),
            nets: Vec::with_capacity(64),
            net_name_map: HashMap::new(),
        }
    }

    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    pub fn add_obstacle(&mut self, coord: GridCoord) {
        self.obstacles.push(coord);
    }

    pub fn add_net(&mut self, name: String) -> NetId {
        if let Some(&id) = self.net_name_map.get(&name) {
            return id;
        }
        let id = NetId::new(self.nets.len());
        self.nets.push(NetData {
            name: name.clone(),
            pins: Vec::new(),
            path: Vec::new(),
            cost: 0,
        });
        self.net_name_map.insert(name, id);
        id
    }

    pub fn add_pin(&mut self, net: NetId, coord: GridCoord) {
        self.nets[net.index()].pins.push(coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_net_is_idempotent_per_name() {
        let mut db = RouteDB::new(10, 10, 0, 0);
        let a = db.add_net("net1".to_string());
        let b = db.add_net("net1".to_string());
        assert_eq!(a, b);
        assert_eq!(db.num_nets(), 1);
    }

    #[test]
    fn net_metrics_from_path() {
        let mut db = RouteDB::new(10, 10, 0, 0);
        let id = db.add_net("net1".to_string());
        db.nets[id.index()].path = vec![
            GridCoord::new(0, 0, 0),
            GridCoord::new(1, 0, 0),
            GridCoord::new(1, 0, 1),
            GridCoord::new(1, 1, 1),
        ];
        let net = &db.nets[id.index()];
        assert!(net.is_routed());
        assert_eq!(net.wire_length(), 3);
        assert_eq!(net.via_count(), 1);
    }
}
