use std::path::PathBuf;

use anyhow::Context;
use bouncebox_kernel::{SimConfig, Simulation};
use bouncebox_render::{ControlPanel, DebugTextRenderer, HeadlessScene, RenderView, Renderer};
use bouncebox_tools::{SimInspector, SimSummary};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bouncebox-cli", about = "Run the bouncing box simulation headless")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default configuration
    Info,
    /// Run the simulation for a number of ticks and print a summary
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of boxes (overrides config)
        #[arg(long)]
        boxes: Option<usize>,
        /// World bounds (overrides config)
        #[arg(long, allow_hyphen_values = true)]
        bounds: Option<f64>,
        /// RNG seed (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Start with box movement off
        #[arg(long)]
        no_move: bool,
        /// Start with box rotation off
        #[arg(long)]
        no_rotate: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// List up to N boxes after the run
        #[arg(long)]
        dump: Option<usize>,
    },
    /// Shrink the world under a running simulation and report recovery
    Shrink {
        /// Bounds before the shrink
        #[arg(long, default_value = "100")]
        from: f64,
        /// Bounds after the shrink
        #[arg(long, default_value = "20")]
        to: f64,
        #[arg(long, default_value = "100")]
        boxes: usize,
        /// Ticks to run before shrinking
        #[arg(long, default_value = "60")]
        warmup: u64,
        /// Give up after this many ticks
        #[arg(long, default_value = "5000")]
        max_ticks: u64,
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the options panel captions
    Panel {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Overrides applied on top of a loaded or default config.
#[derive(Debug, Default)]
struct Overrides {
    boxes: Option<usize>,
    bounds: Option<f64>,
    seed: Option<u64>,
    no_move: bool,
    no_rotate: bool,
}

fn build_config(path: Option<&PathBuf>, overrides: &Overrides) -> anyhow::Result<SimConfig> {
    let mut config = match path {
        Some(p) => SimConfig::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => SimConfig::default(),
    };
    if let Some(n) = overrides.boxes {
        config.entity_count = n;
    }
    if let Some(b) = overrides.bounds {
        config.world_bounds = b;
    }
    if let Some(s) = overrides.seed {
        config.seed = s;
    }
    if overrides.no_move {
        config.motion_enabled = false;
    }
    if overrides.no_rotate {
        config.rotation_enabled = false;
    }
    config.validate()?;
    Ok(config)
}

#[derive(Debug, Serialize)]
struct ShrinkReport {
    from: f32,
    to: f32,
    boxes: usize,
    warmup: u64,
    /// Boxes outside the new bounds right after the shrink.
    outside_at_shrink: usize,
    /// Ticks after the shrink until every box was within one step of the bounds.
    ticks_to_settle: Option<u64>,
    reflections: u64,
    summary: SimSummary,
}

fn run_shrink(
    from: f64,
    to: f64,
    boxes: usize,
    warmup: u64,
    max_ticks: u64,
    seed: u64,
) -> anyhow::Result<ShrinkReport> {
    let config = SimConfig {
        world_bounds: from,
        entity_count: boxes,
        seed,
        ..SimConfig::default()
    };
    config.validate()?;
    let mut sim = Simulation::new(&config, HeadlessScene::new())?;
    sim.run(warmup);

    let from = sim.world_bounds();
    let to = sim.set_world_bounds(to)?;
    let outside_at_shrink = sim.count_outside();

    let mut reflections = 0;
    let mut ticks_to_settle = None;
    for t in 1..=max_ticks {
        reflections += sim.tick().reflections as u64;
        if SimInspector::settled(&sim) {
            ticks_to_settle = Some(t);
            break;
        }
    }
    if ticks_to_settle.is_none() {
        tracing::warn!(max_ticks, "boxes did not settle");
    }

    Ok(ShrinkReport {
        from,
        to,
        boxes,
        warmup,
        outside_at_shrink,
        ticks_to_settle,
        reflections,
        summary: SimInspector::summary(&sim),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("bouncebox-cli v{}", env!("CARGO_PKG_VERSION"));
            print!("{}", SimConfig::default().to_yaml_string()?);
        }
        Commands::Run {
            ticks,
            config,
            boxes,
            bounds,
            seed,
            no_move,
            no_rotate,
            json,
            dump,
        } => {
            let overrides = Overrides {
                boxes,
                bounds,
                seed,
                no_move,
                no_rotate,
            };
            let config = build_config(config.as_ref(), &overrides)?;
            let mut sim = Simulation::new(&config, HeadlessScene::new())?;
            let reflections = sim.run(ticks);
            tracing::info!(ticks, reflections, "run complete");

            let summary = SimInspector::summary(&sim);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
            if let Some(limit) = dump {
                let renderer = DebugTextRenderer::with_limit(limit);
                print!("{}", renderer.render(sim.backend(), &RenderView::default()));
            }
        }
        Commands::Shrink {
            from,
            to,
            boxes,
            warmup,
            max_ticks,
            seed,
            json,
        } => {
            let report = run_shrink(from, to, boxes, warmup, max_ticks, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Shrink {} -> {}: {} of {} boxes outside after shrink",
                    report.from, report.to, report.outside_at_shrink, report.boxes
                );
                match report.ticks_to_settle {
                    Some(t) => println!("Settled after {t} ticks ({} reflections)", report.reflections),
                    None => println!("Did not settle within {max_ticks} ticks"),
                }
                println!("{}", report.summary);
            }
        }
        Commands::Panel { config } => {
            let config = build_config(config.as_ref(), &Overrides::default())?;
            for label in ControlPanel::new(&config).labels() {
                println!("{label}");
            }
        }
    }

    Ok(())
}
