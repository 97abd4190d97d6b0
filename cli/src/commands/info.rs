use colored::*;

use crate::terminal::{colors, print};
use chanman_common::config::Config;
use chanman_core::host::HostCommand;
use chanman_core::store::PositionStore;

pub fn info(cfg: &Config) -> anyhow::Result<()> {
    let mut store = PositionStore::from_config(cfg);
    let remembered: ColoredString = match store.load() {
        Ok(count) => format!("{count} entries").color(colors::ACCENT),
        Err(e) => format!("unreadable ({e})").red(),
    };

    let seed: String = cfg
        .seed
        .map_or_else(|| "from the OS".to_string(), |seed| seed.to_string());
    print::fields(&[
        ("Settings file", store.path().display().to_string().normal()),
        ("Remembered", remembered),
        ("Layout", cfg.layout.to_string().color(colors::ACCENT)),
        ("Seed", seed.normal()),
        (
            "Panel",
            format!("{} x {}", cfg.panel_width, cfg.panel_height).normal(),
        ),
        (
            "Scan interval",
            format!(
                "{:.1}s (fast {:.1}s)",
                cfg.scan_interval.as_secs_f64(),
                cfg.fast_scan_interval.as_secs_f64()
            )
            .normal(),
        ),
        (
            "Read policy",
            format!("{} x {}ms", cfg.max_read_attempts, cfg.read_wait.as_millis()).normal(),
        ),
    ]);

    print::gap();
    print::section("host commands", Some(HostCommand::ALL.len()), cfg.quiet);
    for (idx, command) in HostCommand::ALL.into_iter().enumerate() {
        let info = command.info();
        print::tree(
            idx,
            &info.name.color(colors::PRIMARY).to_string(),
            &[
                ("About".to_string(), info.description.normal()),
                ("Category".to_string(), info.category.normal()),
                (
                    "Shortcut".to_string(),
                    format!("Cmd-{}", info.shortcut).color(colors::ACCENT),
                ),
            ],
        );
    }
    Ok(())
}
