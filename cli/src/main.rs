use clap::{Parser, Subcommand};
use maze_common::db::parser::netlist;
use maze_common::util::config::Config;
use maze_common::util::{check, generator, logger, report, visualization};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Route {
        /// Netlist file; overrides the configured input path.
        #[arg(long)]
        input: Option<String>,
    },
    Generate {
        #[arg(long, default_value_t = 20)]
        width: u32,
        #[arg(long, default_value_t = 20)]
        height: u32,
        #[arg(long, default_value_t = 10)]
        nets: usize,
        #[arg(long, default_value_t = 4)]
        max_pins: usize,
        #[arg(long, default_value_t = 0.10)]
        obstacle_density: f64,
        #[arg(long, default_value_t = 1)]
        bend_penalty: u32,
        #[arg(long, default_value_t = 3)]
        via_penalty: u32,
        #[arg(long, default_value = "inputs/random.txt")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    let command = args.command.unwrap_or(Commands::Route { input: None });

    match command {
        Commands::Generate {
            width,
            height,
            nets,
            max_pins,
            obstacle_density,
            bend_penalty,
            via_penalty,
            output,
        } => {
            let safe_density = obstacle_density.clamp(0.0, 0.5);
            if (safe_density - obstacle_density).abs() > f64::EPSILON {
                log::warn!(
                    "Requested obstacle density {:.2} is unsafe. Clamped to {:.2}",
                    obstacle_density,
                    safe_density
                );
            }

            prepare_output_dir(&output)?;
            generator::generate_random_netlist(
                &output,
                width,
                height,
                nets,
                max_pins,
                safe_density,
                bend_penalty,
                via_penalty,
            )?;
            log::info!("Generated: {}", output);
        }
        Commands::Route { input } => {
            let input = input.unwrap_or_else(|| config.input.netlist_file.clone());
            if let Err(e) = run_routing(&config, &input) {
                log::error!("{:#}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn run_routing(config: &Config, input: &str) -> anyhow::Result<()> {
    if !Path::new(input).exists() {
        return Err(anyhow::anyhow!(
            "Input netlist missing: '{}'. Run 'generate' or point --input at a netlist.",
            input
        ));
    }

    log::info!("Parsing netlist: {}", input);
    let mut db = netlist::parse(input)
        .map_err(|e| anyhow::anyhow!("Invalid netlist in '{}': {}", input, e))?;

    log::info!("Starting Routing...");
    maze_router::route(&mut db, &config.routing);

    prepare_output_dir(&config.output.image_file)?;
    log::info!("Generating routed visualization...");
    visualization::draw_routed_grid(&db, &config.output.image_file, config.output.cell_px);

    check::run(&db).map_err(|e| anyhow::anyhow!("Verification Failed: {}", e))?;

    prepare_output_dir(&config.output.report_file)?;
    log::info!("Writing routing report to {}", config.output.report_file);
    report::save_routing(&db, &config.output.report_file)?;

    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
