use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// How newly discovered entities get their first position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    /// Remembered position, or a uniform-random spot inside the panel.
    Random,
    /// Force-directed placement on every pass that has something to place.
    #[default]
    ForceDirected,
    /// Force-directed placement for the first pass only, random afterwards.
    ForceOnce,
}

impl FromStr for LayoutStrategy {
    type Err = String;

    /// Accepts "random", "force" (or "force-directed") and "force-once", case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "force" | "force-directed" => Ok(Self::ForceDirected),
            "force-once" => Ok(Self::ForceOnce),
            other => Err(format!("invalid layout strategy: {other}")),
        }
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Random => "random",
            Self::ForceDirected => "force",
            Self::ForceOnce => "force-once",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Overrides the per-user settings file that stores remembered positions.
    pub settings_path: Option<PathBuf>,
    pub layout: LayoutStrategy,
    /// Seeds the placement randomizer; `None` seeds from the operating system.
    pub seed: Option<u64>,
    pub panel_width: f32,
    pub panel_height: f32,
    /// Pause between two scans when nothing asked for an early one.
    pub scan_interval: Duration,
    /// Pause used after `do_scan_soon`.
    pub fast_scan_interval: Duration,
    /// How long one read-acquisition attempt may block.
    pub read_wait: Duration,
    /// Read attempts per redraw before the redraw gives up.
    pub max_read_attempts: u32,
    /// 0 = chatty, 1 = warnings and results only, 2 = errors only.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_path: None,
            layout: LayoutStrategy::default(),
            seed: None,
            panel_width: 800.0,
            panel_height: 600.0,
            scan_interval: Duration::from_secs(5),
            fast_scan_interval: Duration::from_millis(500),
            read_wait: Duration::from_millis(10),
            max_read_attempts: 100,
            quiet: 0,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
