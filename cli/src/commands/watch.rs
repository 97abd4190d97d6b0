use std::path::PathBuf;
use std::time::{Duration, Instant};

use colored::*;

use crate::terminal::{colors, format, print, spinner};
use chanman_common::config::Config;
use chanman_common::info;
use chanman_core::host::{DisplayHost, RedrawOutcome};
use chanman_core::scanner::{ScanTiming, ScannerThread, SnapshotFileProbe};

const REDRAW_PERIOD: Duration = Duration::from_millis(100);

/// Follows `snapshot` until Ctrl-C or until `scans` scans were displayed.
pub async fn watch(
    snapshot: PathBuf,
    scans: Option<usize>,
    remember: bool,
    cfg: &Config,
) -> anyhow::Result<()> {
    let probe = SnapshotFileProbe::new(&snapshot);
    probe.read()?;

    let mut host = DisplayHost::from_config(cfg);
    let recalled = host.recall_positions();
    info!("Recalled {recalled} positions from {}", host.positions().path().display());

    let mut scanner = ScannerThread::spawn(probe, ScanTiming::from_config(cfg))?;
    host.attach_scanner(scanner.handoff());

    spinner::start_spinner(&snapshot);
    let start_time: Instant = Instant::now();
    let mut shown: usize = 0;

    let mut ticker = tokio::time::interval(REDRAW_PERIOD);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, shutting down");
                break;
            }
            _ = ticker.tick() => {
                if let RedrawOutcome::Updated { reconcile, .. } = host.on_redraw() {
                    shown += 1;
                    if reconcile.change_seen {
                        report_changes(&reconcile.added, &reconcile.removed);
                        spinner::report_change(reconcile.added.len(), reconcile.removed.len());
                    }
                    spinner::report_scan(shown, host.entities().len());
                }
                if scans.is_some_and(|limit| shown >= limit) {
                    break;
                }
            }
        }
    }

    let published = scanner.stop();
    host.detach_scanner();
    spinner::stop_spinner();

    if remember {
        let names: Vec<(String, _)> = host
            .entities()
            .iter()
            .map(|entity| (entity.name.clone(), entity.position()))
            .collect();
        for (name, position) in names {
            host.reposition(&name, position);
        }
    }
    let saved = host.save_positions();

    print::section("final panel", Some(host.entities().len()), cfg.quiet);
    if cfg.quiet < 2 {
        print::entities(host.entities());
    }

    let elapsed: ColoredString = format!("{:.1}s", start_time.elapsed().as_secs_f64())
        .bold()
        .yellow();
    let summary: String = format!(
        "{} scans displayed of {published} taken in {elapsed}, {saved} positions saved",
        shown.to_string().bold().green()
    );
    print::summary(&summary, cfg.quiet);
    Ok(())
}

fn report_changes(added: &[String], removed: &[String]) {
    if !added.is_empty() {
        info!("Appeared: {}", format::names_to_str(added, colors::ADDED));
    }
    if !removed.is_empty() {
        info!("Vanished: {}", format::names_to_str(removed, colors::REMOVED));
    }
}
