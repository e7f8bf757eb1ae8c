use crate::db::core::RouteDB;
use crate::geom::coord::GridCoord;
use anyhow::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Parses the routing netlist format.
///
/// Line 1: `width,height,bend_penalty,via_penalty`. Every following
/// non-empty line is either an obstacle, `OBS (layer,x,y)`, or a net,
/// `<name> (layer,x,y) (layer,x,y) ...`. Malformed entries are skipped
/// with a warning rather than failing the whole file.
pub fn parse(filename: &str) -> Result<RouteDB> {
    let file = File::open(filename)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = lines
        .next()
        .ok_or_else(|| anyhow::anyhow!("netlist file is empty"))??;
    let fields: Vec<&str> = header.trim().split(',').map(|s| s.trim()).collect();
    if fields.len() < 4 {
        return Err(anyhow::anyhow!(
            "header must be 'width,height,bend_penalty,via_penalty', got '{}'",
            header.trim()
        ));
    }
    let width: u32 = fields[0].parse()?;
    let height: u32 = fields[1].parse()?;
    let bend_penalty: u32 = fields[2].parse()?;
    let via_penalty: u32 = fields[3].parse()?;

    if width == 0 || height == 0 {
        return Err(anyhow::anyhow!(
            "grid dimensions must be positive, got {}x{}",
            width,
            height
        ));
    }

    log::info!(
        "Netlist header: {}x{} grid, bend penalty {}, via penalty {}",
        width,
        height,
        bend_penalty,
        via_penalty
    );

    let mut db = RouteDB::new(width, height, bend_penalty, via_penalty);

    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("OBS") {
            match parse_triples(rest).first() {
                Some(&(layer, x, y)) => {
                    if layer < 0 || x < 0 || y < 0 {
                        // Out-of-range obstacles are a silent no-op.
                        continue;
                    }
                    db.add_obstacle(GridCoord::new(x as u32, y as u32, layer.min(255) as u8));
                }
                None => log::warn!("Skipping malformed obstacle line: {}", line),
            }
            continue;
        }

        let name = match line.split_whitespace().next() {
            Some(n) => n.to_string(),
            None => continue,
        };
        let triples = parse_triples(&line[name.len()..]);
        if triples.is_empty() {
            log::warn!("Net '{}' has no valid pins and will be skipped.", name);
            continue;
        }
        let id = db.add_net(name);
        for (layer, x, y) in triples {
            // Negative coordinates are repaired to 0 here; the router clamps
            // the upper bound and the layer.
            db.add_pin(
                id,
                GridCoord::new(
                    x.max(0) as u32,
                    y.max(0) as u32,
                    layer.clamp(0, 255) as u8,
                ),
            );
        }
    }

    log::info!(
        "Parsed {} obstacles, {} nets from {}",
        db.obstacles.len(),
        db.num_nets(),
        filename
    );
    Ok(db)
}

/// Extracts every `(a,b,c)` integer triple from a line fragment.
fn parse_triples(s: &str) -> Vec<(i64, i64, i64)> {
    let mut out = Vec::new();
    for chunk in s.split('(').skip(1) {
        let Some(body) = chunk.split(')').next() else {
            continue;
        };
        let nums: Vec<i64> = body
            .split(',')
            .filter_map(|f| f.trim().parse().ok())
            .collect();
        if nums.len() == 3 {
            out.push((nums[0], nums[1], nums[2]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "netlist_test_{}_{}.txt",
            std::process::id(),
            contents.len()
        ));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_header_obstacles_and_nets() {
        let path = write_temp("5,6,2,3\nOBS (0,1,2)\nnet1 (0,0,0) (1,4,5)\n");
        let db = parse(path.to_str().unwrap()).unwrap();
        assert_eq!((db.width, db.height), (5, 6));
        assert_eq!((db.bend_penalty, db.via_penalty), (2, 3));
        assert_eq!(db.obstacles, vec![GridCoord::new(1, 2, 0)]);
        assert_eq!(db.num_nets(), 1);
        assert_eq!(db.nets[0].pins.len(), 2);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn skips_malformed_entries_and_empty_nets() {
        let path = write_temp("4,4,0,0\nOBS (bogus)\nnet1 nopins\nnet2 (0,1,1)\n");
        let db = parse(path.to_str().unwrap()).unwrap();
        assert!(db.obstacles.is_empty());
        assert_eq!(db.num_nets(), 1);
        assert_eq!(db.nets[0].name, "net2");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn negative_obstacle_is_ignored_and_negative_pin_repaired() {
        let path = write_temp("4,4,0,0\nOBS (0,-1,2)\nnet1 (0,-3,1) (0,2,2)\n");
        let db = parse(path.to_str().unwrap()).unwrap();
        assert!(db.obstacles.is_empty());
        assert_eq!(db.nets[0].pins[0], GridCoord::new(0, 1, 0));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_zero_sized_grid() {
        let path = write_temp("0,4,0,0\n");
        assert!(parse(path.to_str().unwrap()).is_err());
        std::fs::remove_file(path).unwrap();
    }
}
