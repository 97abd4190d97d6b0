//! # Topology Reconciliation
//!
//! Merges a freshly scanned [`TopologyModel`] into the [`EntitiesPanel`] on screen with as
//! little churn as possible:
//!
//! 1. every displayed entity loses its *visited* and *new* marks, every link becomes suspect;
//! 2. scanned entities already on screen are marked visited, unknown ones are copied in
//!    (visited + new) and their ports indexed;
//! 3. scanned connections are recorded on both endpoint ports, or dropped when an endpoint
//!    does not resolve;
//! 4. entities the scan did not mention are removed together with their ports;
//! 5. links that were not seen again, or that point at a vanished port, are purged.
//!
//! Only additions and removals count as a change. Connection churn never does.

use std::collections::HashSet;

use chanman_common::topology::TopologyModel;
use tracing::{debug, info, warn};

use crate::panel::{EntitiesPanel, Entity};

/// What a reconciliation pass did to the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// An entity appeared or disappeared; the scanner should look again soon.
    pub change_seen: bool,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Scanned connections dropped because an endpoint port is not on screen.
    pub unresolved_connections: usize,
    /// Link records purged from ports in the final step.
    pub purged_links: usize,
    /// Repeated entity names in the snapshot; only the first occurrence is used.
    pub duplicate_names: Vec<String>,
}

pub fn reconcile(panel: &mut EntitiesPanel, scan: &TopologyModel) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    panel.clear_all_visited_flags();
    panel.clear_all_newly_created_flags();
    panel.invalidate_all_connections();

    let mut seen: HashSet<&str> = HashSet::with_capacity(scan.number_of_entities());
    for data in scan.entities() {
        if !seen.insert(data.name.as_str()) {
            warn!("Scan reported entity {} more than once; ignoring the repeat", data.name);
            outcome.duplicate_names.push(data.name.clone());
            continue;
        }

        if let Some(known) = panel.find_known_entity_mut(&data.name) {
            known.set_visited();
            continue;
        }

        let mut fresh = Entity::from_data(data);
        fresh.set_visited();
        fresh.set_newly_created(true);
        panel.add_entity(fresh);
        outcome.added.push(data.name.clone());
    }

    for connection in scan.connections() {
        if !panel.add_connection(
            &connection.out_port_name,
            &connection.in_port_name,
            connection.mode,
        ) {
            debug!(
                "Dropping connection {} -> {}: endpoint not displayed",
                connection.out_port_name, connection.in_port_name
            );
            outcome.unresolved_connections += 1;
        }
    }

    outcome.removed = panel.remove_unvisited_entities();
    outcome.purged_links = panel.remove_invalid_connections();
    panel.adjust_size();

    outcome.change_seen = !outcome.added.is_empty() || !outcome.removed.is_empty();
    if outcome.change_seen {
        info!(
            "Topology changed: {} added, {} removed, {} displayed",
            outcome.added.len(),
            outcome.removed.len(),
            panel.number_of_entities()
        );
    }
    outcome
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
