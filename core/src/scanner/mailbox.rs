//! Single-slot mailbox between the scanner thread and the display thread.
//!
//! The scanner publishes a snapshot only while nobody holds the mailbox, then waits until the
//! display side has consumed it and called [`ScanHandoff::scan_can_proceed`]. At most one
//! snapshot is ever outstanding.

use std::time::{Duration, Instant};

use chanman_common::topology::TopologyModel;
use parking_lot::{Condvar, Mutex};

use super::ScanHandoff;

#[derive(Debug)]
struct MailboxState {
    readers: usize,
    writer: bool,
    scan_complete: bool,
    may_proceed: bool,
    scan_soon: bool,
    stopped: bool,
    snapshot: TopologyModel,
}

#[derive(Debug)]
pub struct ScanMailbox {
    state: Mutex<MailboxState>,
    changed: Condvar,
}

impl Default for ScanMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanMailbox {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MailboxState {
                readers: 0,
                writer: false,
                scan_complete: false,
                may_proceed: true,
                scan_soon: false,
                stopped: false,
                snapshot: TopologyModel::new(),
            }),
            changed: Condvar::new(),
        }
    }

    /// Scanner side: stores `snapshot` and flags the scan as complete once no reader or writer
    /// holds the mailbox. Returns `false` without publishing if the mailbox was stopped.
    pub fn publish(&self, snapshot: TopologyModel) -> bool {
        let mut state = self.state.lock();
        while (state.writer || state.readers > 0) && !state.stopped {
            self.changed.wait(&mut state);
        }
        if state.stopped {
            return false;
        }

        state.snapshot = snapshot;
        state.scan_complete = true;
        state.may_proceed = false;
        self.changed.notify_all();
        true
    }

    /// Scanner side: blocks until the display side has released the previous snapshot, then
    /// sleeps `interval`, or `fast_interval` once a faster scan was requested. Returns `false`
    /// as soon as the mailbox is stopped.
    pub fn wait_for_turn(&self, interval: Duration, fast_interval: Duration) -> bool {
        let mut state = self.state.lock();
        while !state.may_proceed && !state.stopped {
            self.changed.wait(&mut state);
        }

        let started = Instant::now();
        loop {
            if state.stopped {
                return false;
            }
            let pause = if state.scan_soon {
                fast_interval
            } else {
                interval
            };
            let Some(remaining) = pause.checked_sub(started.elapsed()).filter(|d| !d.is_zero())
            else {
                break;
            };
            self.changed.wait_for(&mut state, remaining);
        }

        state.scan_soon = false;
        true
    }

    /// Wakes every waiter and makes further publishing a no-op.
    pub fn stop(&self) {
        self.state.lock().stopped = true;
        self.changed.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }

    /// Whether a published snapshot is waiting to be picked up.
    pub fn has_pending_scan(&self) -> bool {
        self.state.lock().scan_complete
    }

    pub fn scan_soon_requested(&self) -> bool {
        self.state.lock().scan_soon
    }
}

impl ScanHandoff for ScanMailbox {
    fn try_acquire_for_read(&self, wait: Duration) -> bool {
        let deadline = Instant::now() + wait;
        let mut state = self.state.lock();
        while state.writer {
            if self.changed.wait_until(&mut state, deadline).timed_out() && state.writer {
                return false;
            }
        }
        state.readers += 1;
        true
    }

    fn check_and_clear_if_scan_is_complete(&self) -> bool {
        std::mem::take(&mut self.state.lock().scan_complete)
    }

    fn relinquish_from_read(&self) {
        let mut state = self.state.lock();
        state.readers = state.readers.saturating_sub(1);
        self.changed.notify_all();
    }

    fn acquire_for_write(&self) {
        let mut state = self.state.lock();
        while state.writer || state.readers > 0 {
            self.changed.wait(&mut state);
        }
        state.writer = true;
    }

    fn scan_can_proceed(&self) {
        self.state.lock().may_proceed = true;
        self.changed.notify_all();
    }

    fn relinquish_from_write(&self) {
        self.state.lock().writer = false;
        self.changed.notify_all();
    }

    fn entities_data(&self) -> TopologyModel {
        self.state.lock().snapshot.clone()
    }

    fn do_scan_soon(&self) {
        self.state.lock().scan_soon = true;
        self.changed.notify_all();
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

#[cfg(test)]
mod tests {
    use super::*;
    use chanman_common::topology::{ContainerKind, EntityData};
    use std::sync::Arc;
    use std::thread;

    const SHORT: Duration = Duration::from_millis(20);
    const PATIENCE: Duration = Duration::from_secs(5);

    fn snapshot(name: &str) -> TopologyModel {
        let mut model = TopologyModel::new();
        model
            .add_entity(EntityData::new(ContainerKind::Plain, name, "", ""))
            .unwrap();
        model
    }

    /// Runs the display-side read handshake until a completed scan shows up.
    fn wait_for_scan(mailbox: &ScanMailbox) -> bool {
        let deadline = Instant::now() + PATIENCE;
        while Instant::now() < deadline {
            if mailbox.try_acquire_for_read(SHORT) {
                let complete = mailbox.check_and_clear_if_scan_is_complete();
                mailbox.relinquish_from_read();
                if complete {
                    return true;
                }
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    fn let_scanner_proceed(mailbox: &ScanMailbox) {
        mailbox.acquire_for_write();
        mailbox.scan_can_proceed();
        mailbox.relinquish_from_write();
    }

    #[test]
    fn completion_flag_is_cleared_by_checking() {
        let mailbox = ScanMailbox::new();
        assert!(mailbox.publish(snapshot("A")));

        assert!(mailbox.try_acquire_for_read(SHORT));
        assert!(mailbox.check_and_clear_if_scan_is_complete());
        assert!(!mailbox.check_and_clear_if_scan_is_complete());
        mailbox.relinquish_from_read();

        assert!(mailbox.entities_data().find_entity("A").is_some());
    }

    #[test]
    fn read_times_out_while_writer_holds_the_mailbox() {
        let mailbox = ScanMailbox::new();
        mailbox.acquire_for_write();

        let started = Instant::now();
        assert!(!mailbox.try_acquire_for_read(SHORT));
        assert!(started.elapsed() >= SHORT);

        mailbox.relinquish_from_write();
        assert!(mailbox.try_acquire_for_read(SHORT));
        mailbox.relinquish_from_read();
    }

    #[test]
    fn scanner_waits_for_the_display_before_the_next_snapshot() {
        let mailbox = Arc::new(ScanMailbox::new());
        let scanner = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || {
                mailbox.publish(snapshot("first"));
                if mailbox.wait_for_turn(Duration::ZERO, Duration::ZERO) {
                    mailbox.publish(snapshot("second"));
                }
            })
        };

        assert!(wait_for_scan(&mailbox));
        assert!(mailbox.entities_data().find_entity("first").is_some());

        thread::sleep(Duration::from_millis(50));
        assert!(!mailbox.has_pending_scan());

        let_scanner_proceed(&mailbox);
        assert!(wait_for_scan(&mailbox));
        assert!(mailbox.entities_data().find_entity("second").is_some());
        scanner.join().unwrap();
    }

    #[test]
    fn scan_soon_cuts_the_pause_short() {
        let mailbox = Arc::new(ScanMailbox::new());
        let waiter = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || {
                let started = Instant::now();
                let proceeded = mailbox.wait_for_turn(Duration::from_secs(30), Duration::ZERO);
                (proceeded, started.elapsed())
            })
        };

        thread::sleep(SHORT);
        mailbox.do_scan_soon();
        let (proceeded, waited) = waiter.join().unwrap();

        assert!(proceeded);
        assert!(waited < PATIENCE);
        assert!(!mailbox.scan_soon_requested());
    }

    #[test]
    fn stop_releases_a_waiting_scanner() {
        let mailbox = Arc::new(ScanMailbox::new());
        assert!(mailbox.publish(snapshot("A")));
        let waiter = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || mailbox.wait_for_turn(Duration::ZERO, Duration::ZERO))
        };

        thread::sleep(SHORT);
        mailbox.stop();
        assert!(!waiter.join().unwrap());
        assert!(!mailbox.publish(snapshot("B")));
    }
}
