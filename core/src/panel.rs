//! The set of entities currently on screen.
//!
//! Entities are kept in discovery order. Ports are indexed by their topology-wide name so a
//! scanned connection can be resolved to `(entity, port)` in one lookup; connections themselves
//! are stored on both endpoint ports as name pairs, never as references into the panel.

use std::collections::{HashMap, HashSet};

use chanman_common::geometry::Size;
use chanman_common::topology::ChannelMode;
use tracing::{debug, trace};

mod entity;

pub use entity::{Entity, Port, PortLink};

/// Room left around the right-most and bottom-most entity when the panel grows.
const EXTENT_MARGIN: f32 = 32.0;

#[derive(Debug, Clone)]
pub struct EntitiesPanel {
    entities: Vec<Entity>,
    entity_index: HashMap<String, usize>,
    known_ports: HashMap<String, String>,
    visible: Size,
    size: Size,
}

impl EntitiesPanel {
    pub fn new(visible: Size) -> Self {
        Self {
            entities: Vec::new(),
            entity_index: HashMap::new(),
            known_ports: HashMap::new(),
            visible,
            size: visible,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn number_of_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn find_known_entity(&self, name: &str) -> Option<&Entity> {
        self.entity_index.get(name).map(|&idx| &self.entities[idx])
    }

    pub fn find_known_entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entity_index
            .get(name)
            .copied()
            .map(move |idx| &mut self.entities[idx])
    }

    /// Resolves a port name to its owning entity's name.
    pub fn find_known_port(&self, port_name: &str) -> Option<&str> {
        self.known_ports.get(port_name).map(String::as_str)
    }

    /// Adds an entity and indexes its ports. A later port with an already indexed name takes
    /// over that name.
    pub fn add_entity(&mut self, entity: Entity) {
        for port in entity.ports() {
            self.remember_port(&port.name, &entity.name);
        }
        self.entity_index
            .insert(entity.name.clone(), self.entities.len());
        self.entities.push(entity);
    }

    fn remember_port(&mut self, port_name: &str, owner: &str) {
        if let Some(previous) = self
            .known_ports
            .insert(port_name.to_string(), owner.to_string())
        {
            if previous != owner {
                debug!("Port {port_name} moved from {previous} to {owner}");
            }
        }
    }

    /// Records a connection on both endpoints. Returns `false`, touching nothing, when either
    /// port name is unknown.
    pub fn add_connection(&mut self, out_port: &str, in_port: &str, mode: ChannelMode) -> bool {
        let (Some(out_owner), Some(in_owner)) = (
            self.find_known_port(out_port).map(str::to_string),
            self.find_known_port(in_port).map(str::to_string),
        ) else {
            return false;
        };

        if let Some(port) = self
            .find_known_entity_mut(&out_owner)
            .and_then(|entity| entity.port_mut(out_port))
        {
            port.add_output_connection(&in_owner, in_port, mode);
        }
        if let Some(port) = self
            .find_known_entity_mut(&in_owner)
            .and_then(|entity| entity.port_mut(in_port))
        {
            port.add_input_connection(&out_owner, out_port, mode);
        }
        true
    }

    pub fn clear_all_visited_flags(&mut self) {
        self.entities.iter_mut().for_each(Entity::clear_visited);
    }

    pub fn clear_all_newly_created_flags(&mut self) {
        for entity in &mut self.entities {
            entity.set_newly_created(false);
        }
    }

    pub fn invalidate_all_connections(&mut self) {
        for entity in &mut self.entities {
            entity.ports_mut().for_each(Port::invalidate_connections);
        }
    }

    /// Drops every entity not visited by the current scan, with its ports. Returns their names.
    pub fn remove_unvisited_entities(&mut self) -> Vec<String> {
        let (kept, removed): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(Entity::is_visited);
        self.entities = kept;

        if removed.is_empty() {
            return Vec::new();
        }

        self.rebuild_indexes();
        removed.into_iter().map(|entity| entity.name).collect()
    }

    /// Purges links that were not re-validated by this scan or whose far end no longer exists.
    /// Returns the number of link records removed.
    pub fn remove_invalid_connections(&mut self) -> usize {
        let live: HashSet<(String, String)> = self
            .entities
            .iter()
            .flat_map(|entity| {
                entity
                    .ports()
                    .iter()
                    .map(move |port| (entity.name.clone(), port.name.clone()))
            })
            .collect();

        let mut purged = 0;
        for entity in &mut self.entities {
            for port in entity.ports_mut() {
                purged += port.retain_connections(|link| {
                    link.is_valid() && live.contains(&(link.entity.clone(), link.port.clone()))
                });
            }
        }
        if purged > 0 {
            trace!("Purged {purged} stale connection records");
        }
        purged
    }

    /// Forgets every layout-graph handle; they only live for one layout pass.
    pub fn clear_node_values(&mut self) {
        for entity in &mut self.entities {
            entity.set_node(None);
        }
    }

    /// Grows the panel to enclose all entities, never shrinking below the visible area.
    pub fn adjust_size(&mut self) {
        let extent = self
            .entities
            .iter()
            .map(|entity| {
                let bounds = entity.bounds();
                Size::new(bounds.right() + EXTENT_MARGIN, bounds.bottom() + EXTENT_MARGIN)
            })
            .fold(Size::default(), Size::max);
        self.size = self.visible.max(extent);
    }

    pub fn resize(&mut self, visible: Size) {
        self.visible = visible;
        self.adjust_size();
    }

    /// Current drawable size, at least as large as the visible area.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn visible_size(&self) -> Size {
        self.visible
    }

    fn rebuild_indexes(&mut self) {
        self.entity_index = self
            .entities
            .iter()
            .enumerate()
            .map(|(idx, entity)| (entity.name.clone(), idx))
            .collect();

        let entities = &self.entities;
        let entity_index = &self.entity_index;
        self.known_ports.retain(|port_name, owner| {
            entity_index
                .get(owner)
                .is_some_and(|&idx| entities[idx].port(port_name).is_some())
        });
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
    use chanman_common::geometry::Position;
    use chanman_common::topology::{ContainerKind, EntityData, PortData, PortDirection, PortUsage};

    fn entity(name: &str, ports: &[&str]) -> Entity {
        let mut data = EntityData::new(ContainerKind::Plain, name, "", "");
        for port in ports {
            data.add_port(PortData::new(*port, PortUsage::Other, PortDirection::Unknown));
        }
        Entity::from_data(&data)
    }

    fn panel_with(entities: Vec<Entity>) -> EntitiesPanel {
        let mut panel = EntitiesPanel::new(Size::new(400.0, 300.0));
        for e in entities {
            panel.add_entity(e);
        }
        panel
    }

    #[test]
    fn add_connection_records_both_sides() {
        let mut panel = panel_with(vec![entity("a", &["/a/out"]), entity("b", &["/b/in"])]);

        assert!(panel.add_connection("/a/out", "/b/in", ChannelMode::Tcp));

        let out = panel.find_known_entity("a").unwrap().port("/a/out").unwrap();
        let inp = panel.find_known_entity("b").unwrap().port("/b/in").unwrap();
        assert_eq!(out.output_connections()[0].entity, "b");
        assert_eq!(out.output_connections()[0].port, "/b/in");
        assert_eq!(inp.input_connections()[0].entity, "a");
        assert_eq!(inp.input_connections()[0].port, "/a/out");
    }

    #[test]
    fn add_connection_with_unknown_endpoint_changes_nothing() {
        let mut panel = panel_with(vec![entity("a", &["/a/out"])]);

        assert!(!panel.add_connection("/a/out", "/nowhere", ChannelMode::Tcp));
        assert!(!panel.find_known_entity("a").unwrap().port("/a/out").unwrap().has_connections());
    }

    #[test]
    fn removing_an_entity_unindexes_its_ports_and_purges_links() {
        let mut panel = panel_with(vec![entity("a", &["/a/out"]), entity("b", &["/b/in"])]);
        panel.add_connection("/a/out", "/b/in", ChannelMode::Tcp);

        panel.clear_all_visited_flags();
        panel.find_known_entity_mut("a").unwrap().set_visited();
        assert_eq!(panel.remove_unvisited_entities(), vec!["b".to_string()]);

        assert!(panel.find_known_port("/b/in").is_none());
        assert_eq!(panel.find_known_port("/a/out"), Some("a"));
        assert_eq!(panel.remove_invalid_connections(), 1);
        assert!(!panel.find_known_entity("a").unwrap().port("/a/out").unwrap().has_connections());
    }

    #[test]
    fn invalidated_links_survive_only_if_seen_again() {
        let mut panel = panel_with(vec![
            entity("a", &["/a/out"]),
            entity("b", &["/b/in"]),
            entity("c", &["/c/in"]),
        ]);
        panel.add_connection("/a/out", "/b/in", ChannelMode::Tcp);
        panel.add_connection("/a/out", "/c/in", ChannelMode::Tcp);

        panel.invalidate_all_connections();
        panel.add_connection("/a/out", "/b/in", ChannelMode::Tcp);
        assert_eq!(panel.remove_invalid_connections(), 2);

        let out = panel.find_known_entity("a").unwrap().port("/a/out").unwrap();
        assert_eq!(out.output_connections().len(), 1);
        assert_eq!(out.output_connections()[0].entity, "b");
    }

    #[test]
    fn adjust_size_grows_but_never_below_visible() {
        let mut panel = panel_with(vec![entity("a", &[])]);
        panel.adjust_size();
        assert_eq!(panel.size(), Size::new(400.0, 300.0));

        panel
            .find_known_entity_mut("a")
            .unwrap()
            .set_position(Position::new(900.0, 10.0));
        panel.adjust_size();
        let width = panel.find_known_entity("a").unwrap().size().width;
        assert_eq!(panel.size().width, 900.0 + width + EXTENT_MARGIN);
        assert_eq!(panel.size().height, 300.0);
    }

    #[test]
    fn clear_node_values_forgets_handles() {
        let mut panel = panel_with(vec![entity("a", &[])]);
        panel
            .find_known_entity_mut("a")
            .unwrap()
            .set_node(Some(petgraph::graph::NodeIndex::new(3)));
        panel.clear_node_values();
        assert!(panel.find_known_entity("a").unwrap().node().is_none());
    }
}
