//! The boundary between the background scanner and the display.
//!
//! The display side only ever talks to a [`ScanHandoff`]. The scanner side is a
//! [`ScannerThread`] that runs a [`TopologyProbe`] in a loop and hands each snapshot over
//! through a [`ScanMailbox`].
//!
//! One round of the handshake, as seen from the display thread:
//!
//! 1. `try_acquire_for_read`, then `check_and_clear_if_scan_is_complete`, then
//!    `relinquish_from_read`;
//! 2. if a scan was complete, consume `entities_data()`;
//! 3. `acquire_for_write`, `scan_can_proceed`, `relinquish_from_write`.
//!
//! The scanner never publishes while the mailbox is held and never starts the next scan before
//! step 3.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use chanman_common::config::Config;
use chanman_common::topology::TopologyModel;
use chanman_common::{error, success};
use tracing::debug;

mod mailbox;
mod probe;

pub use mailbox::ScanMailbox;
pub use probe::{ProbeError, SnapshotFileProbe, StaticProbe};

/// Reader/writer handshake over the scanner's latest result.
pub trait ScanHandoff: Send + Sync {
    /// Waits at most `wait` for a read lock. `false` if it could not be had in time.
    fn try_acquire_for_read(&self, wait: Duration) -> bool;

    /// Reports whether a new scan finished since the last call, and resets the flag.
    /// Call with the read lock held.
    fn check_and_clear_if_scan_is_complete(&self) -> bool;

    fn relinquish_from_read(&self);

    /// Blocks until exclusive access is granted.
    fn acquire_for_write(&self);

    /// Lets the scanner start its next scan.
    fn scan_can_proceed(&self);

    fn relinquish_from_write(&self);

    /// A copy of the most recently published snapshot.
    fn entities_data(&self) -> TopologyModel;

    /// Asks for the next scan to start sooner than usual.
    fn do_scan_soon(&self);
}

/// A source of topology snapshots, polled from the scanner thread.
pub trait TopologyProbe: Send {
    fn scan(&mut self) -> anyhow::Result<TopologyModel>;

    fn describe(&self) -> String {
        "topology probe".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTiming {
    pub interval: Duration,
    /// Used instead of `interval` right after `do_scan_soon`.
    pub fast_interval: Duration,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ScanTiming {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            interval: cfg.scan_interval,
            fast_interval: cfg.fast_scan_interval,
        }
    }
}

/// Background thread scanning with one probe. Stopped and joined on drop.
#[derive(Debug)]
pub struct ScannerThread {
    mailbox: Arc<ScanMailbox>,
    handle: Option<JoinHandle<usize>>,
}

impl ScannerThread {
    pub fn spawn<P>(probe: P, timing: ScanTiming) -> anyhow::Result<Self>
    where
        P: TopologyProbe + 'static,
    {
        let mailbox = Arc::new(ScanMailbox::new());
        let shared = Arc::clone(&mailbox);

        let handle = thread::Builder::new()
            .name("chanman-scanner".to_string())
            .spawn(move || scan_loop(probe, &shared, timing))
            .context("failed to start the scanner thread")?;

        Ok(Self {
            mailbox,
            handle: Some(handle),
        })
    }

    pub fn mailbox(&self) -> Arc<ScanMailbox> {
        Arc::clone(&self.mailbox)
    }

    pub fn handoff(&self) -> Arc<dyn ScanHandoff> {
        self.mailbox()
    }

    /// Stops the loop and waits for the thread. Returns how many snapshots it published.
    pub fn stop(&mut self) -> usize {
        self.mailbox.stop();
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.join() {
            Ok(published) => published,
            Err(_) => {
                error!("Scanner thread panicked");
                0
            }
        }
    }
}

impl Drop for ScannerThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn scan_loop<P: TopologyProbe>(mut probe: P, mailbox: &ScanMailbox, timing: ScanTiming) -> usize {
    debug!("Scanner started on {}", probe.describe());
    let mut published = 0;

    loop {
        match probe.scan() {
            Ok(snapshot) => {
                let entities = snapshot.number_of_entities();
                if !mailbox.publish(snapshot) {
                    break;
                }
                published += 1;
                if published == 1 {
                    success!("First scan of {} found {entities} entities", probe.describe());
                }
            }
            Err(e) => error!("Scan of {} failed: {e:#}", probe.describe()),
        }

        if !mailbox.wait_for_turn(timing.interval, timing.fast_interval) {
            break;
        }
    }

    debug!("Scanner stopped after {published} snapshots");
    published
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
