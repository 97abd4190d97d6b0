use std::path::Path;
use std::sync::Arc;

use colored::*;

use crate::terminal::{colors, print};
use chanman_common::config::Config;
use chanman_common::geometry::Position;
use chanman_common::success;
use chanman_core::host::{DisplayHost, RedrawOutcome};
use chanman_core::scanner::{ScanMailbox, SnapshotFileProbe};

/// Runs one scan-to-layout round on `snapshot` without a background thread.
pub fn layout(snapshot: &Path, save: bool, cfg: &Config) -> anyhow::Result<()> {
    let model = SnapshotFileProbe::new(snapshot).read()?;

    let mailbox = Arc::new(ScanMailbox::new());
    mailbox.publish(model);

    let mut host = DisplayHost::from_config(cfg);
    host.recall_positions();
    host.attach_scanner(mailbox);

    let RedrawOutcome::Updated { layout, .. } = host.on_redraw() else {
        anyhow::bail!("snapshot was not picked up");
    };

    if host.entities().is_empty() {
        print::nothing("entities", cfg.quiet);
        return Ok(());
    }

    print::section("layout", Some(host.entities().len()), cfg.quiet);
    if cfg.quiet < 2 {
        print::entities(host.entities());
    }

    let placed: Vec<(String, Position)> = layout.placed;
    let saved: Option<usize> = if save {
        save_placed(&mut host, &placed)
    } else {
        None
    };

    let method: ColoredString = if layout.force_directed {
        "force-directed".color(colors::ACCENT)
    } else {
        "random".color(colors::ACCENT)
    };
    let summary: String = format!(
        "{} entities placed ({method}), panel {} x {}",
        placed.len().to_string().bold().green(),
        host.panel().size().width,
        host.panel().size().height
    );
    print::summary(&summary, cfg.quiet);
    if let Some(count) = saved {
        success!("{count} positions saved to {}", host.positions().path().display());
    }
    Ok(())
}

/// Remembers every placed entity and writes the store. `None` when nothing reached the file.
fn save_placed(host: &mut DisplayHost, placed: &[(String, Position)]) -> Option<usize> {
    for (name, position) in placed {
        host.reposition(name, *position);
    }
    match host.save_positions() {
        0 => None,
        count => Some(count),
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
