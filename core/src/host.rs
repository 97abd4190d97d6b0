//! # Display Host
//!
//! Owns everything the foreground thread shows: the [`EntitiesPanel`], the remembered
//! positions, the layout engine and the background style. [`DisplayHost::on_redraw`] is called
//! whenever the display gets a chance to repaint and is the only place scan results enter the
//! panel.

use std::sync::Arc;
use std::time::Duration;

use chanman_common::config::Config;
use chanman_common::geometry::{Position, Size};
use chanman_common::warn;
use tracing::{debug, trace};

use crate::layout::{LayoutEngine, LayoutReport};
use crate::panel::{EntitiesPanel, Entity};
use crate::reconcile::{ReconcileOutcome, reconcile};
use crate::scanner::ScanHandoff;
use crate::store::PositionStore;

mod background;
mod command;

pub use background::{Background, BackgroundFill, Colour};
pub use command::{CommandInfo, HostCommand};

#[derive(Debug, Clone, PartialEq)]
pub enum RedrawOutcome {
    /// No scanner attached, or no new scan since the last redraw.
    Idle,
    /// The scan results stayed locked for every read attempt.
    Busy,
    /// A completed scan was discarded on request.
    Skipped,
    Updated {
        reconcile: ReconcileOutcome,
        layout: LayoutReport,
    },
}

pub struct DisplayHost {
    panel: EntitiesPanel,
    store: PositionStore,
    layout: LayoutEngine,
    scanner: Option<Arc<dyn ScanHandoff>>,
    skip_next_scan: bool,
    background: Background,
    repaint_requested: bool,
    read_wait: Duration,
    max_read_attempts: u32,
}

impl DisplayHost {
    pub fn new(store: PositionStore, layout: LayoutEngine, visible: Size) -> Self {
        let defaults = Config::default();
        Self {
            panel: EntitiesPanel::new(visible),
            store,
            layout,
            scanner: None,
            skip_next_scan: false,
            background: Background::default(),
            repaint_requested: false,
            read_wait: defaults.read_wait,
            max_read_attempts: defaults.max_read_attempts,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            PositionStore::from_config(cfg),
            LayoutEngine::from_config(cfg),
            Size::new(cfg.panel_width, cfg.panel_height),
        )
        .with_read_policy(cfg.read_wait, cfg.max_read_attempts)
    }

    /// How long one read attempt may block, and how many attempts one redraw makes.
    pub fn with_read_policy(mut self, wait: Duration, attempts: u32) -> Self {
        self.read_wait = wait;
        self.max_read_attempts = attempts.max(1);
        self
    }

    pub fn attach_scanner(&mut self, scanner: Arc<dyn ScanHandoff>) {
        self.scanner = Some(scanner);
    }

    pub fn detach_scanner(&mut self) -> Option<Arc<dyn ScanHandoff>> {
        self.scanner.take()
    }

    /// Picks up a completed scan, if there is one, and releases the scanner for the next one.
    pub fn on_redraw(&mut self) -> RedrawOutcome {
        let Some(scanner) = self.scanner.clone() else {
            return RedrawOutcome::Idle;
        };

        if !self.acquire_for_read(scanner.as_ref()) {
            debug!(
                "Scan results still locked after {} attempts",
                self.max_read_attempts
            );
            return RedrawOutcome::Busy;
        }
        let scan_ready = scanner.check_and_clear_if_scan_is_complete();
        scanner.relinquish_from_read();

        if !scan_ready {
            return RedrawOutcome::Idle;
        }

        let outcome = if self.skip_next_scan {
            self.skip_next_scan = false;
            scanner.do_scan_soon();
            debug!("Discarded one scan as requested");
            RedrawOutcome::Skipped
        } else {
            let snapshot = scanner.entities_data();
            let reconcile = reconcile(&mut self.panel, &snapshot);
            if reconcile.change_seen {
                scanner.do_scan_soon();
            }
            let layout = self.layout.set_entity_positions(&mut self.panel, &self.store);
            self.panel.adjust_size();
            if reconcile.change_seen {
                self.repaint_requested = true;
            }
            RedrawOutcome::Updated { reconcile, layout }
        };

        scanner.acquire_for_write();
        scanner.scan_can_proceed();
        scanner.relinquish_from_write();
        outcome
    }

    fn acquire_for_read(&self, scanner: &dyn ScanHandoff) -> bool {
        (0..self.max_read_attempts).any(|attempt| {
            let locked = scanner.try_acquire_for_read(self.read_wait);
            if !locked {
                trace!("Read attempt {} on scan results timed out", attempt + 1);
            }
            locked
        })
    }

    /// Makes the next completed scan be thrown away instead of displayed.
    pub fn skip_scan(&mut self) {
        self.skip_next_scan = true;
    }

    pub fn is_skipping_next_scan(&self) -> bool {
        self.skip_next_scan
    }

    /// A user moved `name` to `position`. The entity keeps the position verbatim and it is
    /// remembered for later sessions. `false` if no such entity is displayed.
    pub fn reposition(&mut self, name: &str, position: Position) -> bool {
        let Some(entity) = self.panel.find_known_entity_mut(name) else {
            return false;
        };
        entity.set_position(position);
        if let Err(e) = self.store.remember(name, position) {
            warn!("Position of {name} not remembered: {e}");
        }
        self.panel.adjust_size();
        self.repaint_requested = true;
        true
    }

    /// Runs `command`. Returns whether it was handled.
    pub fn perform(&mut self, command: HostCommand) -> bool {
        match command {
            HostCommand::Repaint => {}
            HostCommand::InvertBackground => self.background.toggle_invert(),
            HostCommand::WhiteBackground => self.background.toggle_white(),
        }
        self.repaint_requested = true;
        true
    }

    pub fn request_repaint(&mut self) {
        self.repaint_requested = true;
    }

    /// Returns and clears the pending repaint request.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    pub fn background(&self) -> Background {
        self.background
    }

    /// Fill for the visible area; it does not stretch with a panel grown by its entities.
    pub fn background_fill(&self) -> BackgroundFill {
        self.background.fill(self.panel.visible_size())
    }

    pub fn entities(&self) -> &[Entity] {
        self.panel.entities()
    }

    pub fn panel(&self) -> &EntitiesPanel {
        &self.panel
    }

    /// The rendering layer measured an entity; `false` if it is not displayed.
    pub fn set_entity_size(&mut self, name: &str, size: Size) -> bool {
        let Some(entity) = self.panel.find_known_entity_mut(name) else {
            return false;
        };
        entity.set_size(size);
        self.panel.adjust_size();
        true
    }

    pub fn resize(&mut self, visible: Size) {
        self.panel.resize(visible);
        self.repaint_requested = true;
    }

    pub fn positions(&self) -> &PositionStore {
        &self.store
    }

    /// Reloads remembered positions. Failures are logged and leave an empty mapping.
    pub fn recall_positions(&mut self) -> usize {
        match self.store.load() {
            Ok(count) => count,
            Err(e) => {
                warn!("Remembered positions unavailable: {e}");
                0
            }
        }
    }

    /// Writes remembered positions. Failures are logged and otherwise ignored.
    pub fn save_positions(&self) -> usize {
        match self.store.save() {
            Ok(count) => count,
            Err(e) => {
                warn!("Positions not saved: {e}");
                0
            }
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
