//! Rebound CLI
//!
//! Plays canned gestures through a scroll controller and prints the resulting
//! positions frame by frame, and validates scroll configuration files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rebound_animation::SnapBack;
use rebound_scroll::ScrollConfig;

mod simulate;

use simulate::{Scenario, Simulation};

/// Rebound - kinetic scrolling playground
#[derive(Parser)]
#[command(name = "rebound")]
#[command(about = "Simulate kinetic scrolling and check scroll configs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scroll config file (TOML); defaults apply to missing keys
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a gesture and print value, overshoot and scrollbar opacity per frame
    Simulate {
        /// Gesture to play
        #[arg(short, long, value_enum, default_value_t = Scenario::Flick)]
        scenario: Scenario,

        /// Flick speed in units per millisecond
        #[arg(long, default_value_t = 2.0)]
        velocity: f64,

        /// Content length
        #[arg(long, default_value_t = 2000.0)]
        content: f64,

        /// Viewport length
        #[arg(long, default_value_t = 400.0)]
        page: f64,

        /// Initial scroll position
        #[arg(long, default_value_t = 0.0)]
        start: f64,

        /// Stop after this many milliseconds even if still moving
        #[arg(long, default_value_t = 5000.0)]
        duration: f64,

        /// Print every Nth frame
        #[arg(long, default_value_t = 1)]
        every: usize,
    },

    /// Validate a config file and summarize it
    Check {
        /// Config file to check
        path: PathBuf,
    },

    /// Print a complete config as TOML
    DumpConfig {
        #[arg(short, long, value_enum, default_value_t = Preset::Default)]
        preset: Preset,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Default,
    Snappy,
    Gentle,
    NoOvershoot,
}

impl Preset {
    fn config(self) -> ScrollConfig {
        match self {
            Preset::Default => ScrollConfig::default(),
            Preset::Snappy => ScrollConfig::snappy(),
            Preset::Gentle => ScrollConfig::gentle(),
            Preset::NoOvershoot => ScrollConfig::no_overshoot(),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ScrollConfig> {
    match path {
        Some(path) => ScrollConfig::load(path)
            .with_context(|| format!("Failed to load scroll config {}", path.display())),
        None => Ok(ScrollConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate {
            scenario,
            velocity,
            content,
            page,
            start,
            duration,
            every,
        } => {
            let config = load_config(cli.config.as_deref())?;
            tracing::info!("Simulating {:?} over {} units (page {})", scenario, content, page);

            let mut simulation = Simulation::new(config, content, page, start)
                .context("Failed to create scroll controller")?;
            let every = every.max(1);
            let mut index = 0usize;

            println!(
                "{:>9} {:>10} {:>10} {:>8}  fade",
                "t(ms)", "value", "overshoot", "opacity"
            );
            simulation.run(simulate::script(scenario, velocity), duration, |frame| {
                if index % every == 0 {
                    println!(
                        "{:>9.1} {:>10.2} {:>10.2} {:>8.3}  {:?}",
                        frame.time_ms, frame.value, frame.overshoot, frame.opacity, frame.fade
                    );
                }
                index += 1;
            });
            tracing::info!("{} frames", index);
        }
        Commands::Check { path } => {
            let config = load_config(Some(&path))?;
            let settle = SnapBack::new(config.max_overshoot_distance, 0.0, 0.0, config.physics.spring)
                .settle_time_ms(config.physics.rest_threshold);

            println!("{}: ok", path.display());
            println!("  kinetic scrolling:  {}", config.kinetic_scrolling_enabled);
            println!(
                "  overshoot:          {} (max {})",
                config.enable_overshoot, config.max_overshoot_distance
            );
            println!("  full snap-back:     {:.0}ms", settle);
            println!("  overlay scrollbars: {}", config.overlay_scrollbars);
        }
        Commands::DumpConfig { preset } => {
            let config = match cli.config.as_deref() {
                Some(path) => load_config(Some(path))?,
                None => preset.config(),
            };
            let toml = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            print!("{}", toml);
        }
    }

    Ok(())
}
