use colored::*;

use crate::terminal::{colors, format, print};
use chanman_common::config::Config;
use chanman_common::{success, warn};
use chanman_core::store::PositionStore;

pub fn list(cfg: &Config) -> anyhow::Result<()> {
    let mut store = PositionStore::from_config(cfg);
    store.load()?;

    if store.is_empty() {
        print::nothing("remembered positions", cfg.quiet);
        return Ok(());
    }

    print::section("remembered positions", Some(store.len()), cfg.quiet);
    let rows: Vec<(&str, ColoredString)> = store
        .iter()
        .map(|(name, position)| (name, format::position_to_str(position)))
        .collect();
    print::fields(&rows);

    let total: ColoredString = store.len().to_string().color(colors::ACCENT).bold();
    success!("{total} positions in {}", store.path().display());
    Ok(())
}

pub fn forget(name: &str, cfg: &Config) -> anyhow::Result<()> {
    let mut store = PositionStore::from_config(cfg);
    store.load()?;

    match store.forget(name) {
        Some(position) => {
            store.save()?;
            success!("Forgot {name} at {position}");
        }
        None => warn!("No remembered position for {name}"),
    }
    Ok(())
}
