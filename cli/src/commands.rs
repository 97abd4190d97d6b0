pub mod info;
pub mod layout;
pub mod positions;
pub mod watch;

use std::path::PathBuf;

use chanman_common::config::{Config, LayoutStrategy};
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chanman")]
#[command(about = "Lays out and watches a channel topology.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Placement for new entities: random, force or force-once
    #[arg(long, global = true, default_value_t = LayoutStrategy::default())]
    pub layout: LayoutStrategy,

    /// Seed for reproducible placement
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// File holding remembered positions
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Visible panel width
    #[arg(long, global = true, default_value_t = 800.0)]
    pub width: f32,

    /// Visible panel height
    #[arg(long, global = true, default_value_t = 600.0)]
    pub height: f32,

    /// Less output; repeat for even less
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the configuration and the host commands
    #[command(alias = "i")]
    Info,
    /// Follow a snapshot file, re-scanning it in the background
    #[command(alias = "w")]
    Watch {
        snapshot: PathBuf,
        /// Stop after this many completed scans
        #[arg(long)]
        scans: Option<usize>,
        /// Seconds between scans
        #[arg(long, default_value_t = 5.0)]
        interval: f64,
        /// Remember every displayed position on exit
        #[arg(long)]
        remember: bool,
    },
    /// Lay out a snapshot once and print the result
    #[command(alias = "l")]
    Layout {
        snapshot: PathBuf,
        /// Remember the computed positions
        #[arg(long)]
        save: bool,
    },
    /// List remembered positions
    #[command(alias = "p")]
    Positions,
    /// Drop the remembered position of an entity
    Forget { name: String },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        let mut cfg = Config {
            settings_path: self.settings.clone(),
            layout: self.layout,
            seed: self.seed,
            panel_width: self.width,
            panel_height: self.height,
            quiet: self.quiet,
            ..Config::default()
        };
        if let Commands::Watch { interval, .. } = &self.command {
            if let Ok(interval) = std::time::Duration::try_from_secs_f64(*interval) {
                cfg.scan_interval = interval;
                cfg.fast_scan_interval = cfg.fast_scan_interval.min(interval);
            }
        }
        cfg
    }
}
