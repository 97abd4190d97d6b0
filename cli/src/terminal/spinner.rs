//! Status line for `watch`. Log and print output is routed above it while it is drawing.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(120);

static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

pub fn start_spinner(source: &Path) -> &'static ProgressBar {
    SPINNER.get_or_init(|| {
        let style = ProgressStyle::with_template("{spinner:.blue} {prefix} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒", "●"]);
        let pb = ProgressBar::new_spinner().with_style(style);
        pb.set_prefix(format!("{}", "waiting for the first scan".italic()));
        pb.set_message(format!("of {} (Ctrl-C to stop)", source.display()));
        pb.enable_steady_tick(TICK);
        pb
    })
}

/// A scan reached the panel.
pub fn report_scan(scans: usize, entities: usize) {
    if let Some(pb) = SPINNER.get() {
        pb.set_prefix(format!(
            "{} entities after {} scans",
            entities.to_string().green().bold(),
            scans.to_string().bold()
        ));
    }
}

/// The last scan added or removed entities.
pub fn report_change(added: usize, removed: usize) {
    if let Some(pb) = SPINNER.get() {
        pb.set_message(format!(
            "· last change {} {} at {}s",
            format!("+{added}").green(),
            format!("-{removed}").red(),
            pb.elapsed().as_secs()
        ));
    }
}

pub fn stop_spinner() {
    if let Some(pb) = SPINNER.get() {
        pb.finish_and_clear();
    }
}

fn is_drawing(pb: &ProgressBar) -> bool {
    !pb.is_finished() && !pb.is_hidden()
}

/// Routes log output above a running spinner, or straight to stdout otherwise.
pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match SPINNER.get() {
            Some(pb) if is_drawing(pb) => pb.println(msg),
            _ => println!("{msg}"),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
