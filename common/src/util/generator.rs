use rand::Rng;
use std::fs::File;
use std::io::Write;

/// Writes a random benchmark in the routing netlist format: scattered
/// per-layer obstacles followed by multi-pin nets.
#[allow(clippy::too_many_arguments)]
pub fn generate_random_netlist(
    filename: &str,
    width: u32,
    height: u32,
    num_nets: usize,
    max_pins: usize,
    obstacle_density: f64,
    bend_penalty: u32,
    via_penalty: u32,
) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    let mut rng = rand::thread_rng();

    let density = obstacle_density.clamp(0.0, 0.5);
    let num_obstacles = ((width * height * 2) as f64 * density) as usize;

    log::info!(
        "Generating Benchmark: {}x{} grid, {} nets, {} obstacles (density {:.2})",
        width,
        height,
        num_nets,
        num_obstacles,
        density
    );

    writeln!(file, "{},{},{},{}", width, height, bend_penalty, via_penalty)?;

    for _ in 0..num_obstacles {
        let layer = rng.gen_range(0..2u8);
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        writeln!(file, "OBS ({},{},{})", layer, x, y)?;
    }

    for i in 0..num_nets {
        let pins = rng.gen_range(2..=max_pins.max(2));
        write!(file, "net{}", i + 1)?;
        for _ in 0..pins {
            let layer = rng.gen_range(0..2u8);
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            write!(file, " ({},{},{})", layer, x, y)?;
        }
        writeln!(file)?;
    }
    Ok(())
}
