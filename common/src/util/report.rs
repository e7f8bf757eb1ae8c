use crate::db::core::RouteDB;
use std::fs::File;
use std::io::Write;

/// Writes the routed-path report: one line per net,
/// `<name> Cost: <cost> Path: (layer,x,y) ...`.
pub fn save_routing(db: &RouteDB, filename: &str) -> std::io::Result<()> {
    let mut file = File::create(filename)?;

    for net in &db.nets {
        if !net.is_routed() {
            writeln!(file, "{} UNROUTABLE", net.name)?;
            continue;
        }
        write!(file, "{} Cost: {} Path:", net.name, net.cost)?;
        for cell in &net.path {
            write!(file, " {}", cell)?;
        }
        writeln!(file)?;
    }
    Ok(())
}
