use chanman_common::geometry::{Bounds, Position, Size};
use chanman_common::topology::{
    ChannelMode, ContainerKind, EntityData, PortData, PortDirection, PortUsage,
};
use petgraph::graph::NodeIndex;

const CHAR_WIDTH: f32 = 7.0;
const ROW_HEIGHT: f32 = 16.0;
const PADDING: f32 = 8.0;
const MIN_WIDTH: f32 = 60.0;

/// One end of a connection as recorded on the other end: which port, owned by which entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortLink {
    pub entity: String,
    pub port: String,
    pub mode: ChannelMode,
    valid: bool,
}

impl PortLink {
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// A displayed port and the connections drawn from and to it.
#[derive(Debug, Clone)]
pub struct Port {
    pub name: String,
    pub number: u32,
    pub protocol: String,
    pub protocol_description: String,
    pub usage: PortUsage,
    pub direction: PortDirection,
    outputs: Vec<PortLink>,
    inputs: Vec<PortLink>,
}

impl Port {
    fn from_data(data: &PortData) -> Self {
        Self {
            name: data.name.clone(),
            number: data.number,
            protocol: data.protocol.clone(),
            protocol_description: data.protocol_description.clone(),
            usage: data.usage,
            direction: data.direction,
            outputs: Vec::new(),
            inputs: Vec::new(),
        }
    }

    pub fn output_connections(&self) -> &[PortLink] {
        &self.outputs
    }

    pub fn input_connections(&self) -> &[PortLink] {
        &self.inputs
    }

    pub fn has_connections(&self) -> bool {
        !self.outputs.is_empty() || !self.inputs.is_empty()
    }

    pub(crate) fn add_output_connection(&mut self, entity: &str, port: &str, mode: ChannelMode) {
        upsert_link(&mut self.outputs, entity, port, mode);
    }

    pub(crate) fn add_input_connection(&mut self, entity: &str, port: &str, mode: ChannelMode) {
        upsert_link(&mut self.inputs, entity, port, mode);
    }

    pub(crate) fn invalidate_connections(&mut self) {
        for link in self.outputs.iter_mut().chain(self.inputs.iter_mut()) {
            link.valid = false;
        }
    }

    /// Keeps the links for which `keep` holds and returns how many were dropped.
    pub(crate) fn retain_connections(&mut self, mut keep: impl FnMut(&PortLink) -> bool) -> usize {
        let before = self.outputs.len() + self.inputs.len();
        self.outputs.retain(|link| keep(link));
        self.inputs.retain(|link| keep(link));
        before - (self.outputs.len() + self.inputs.len())
    }
}

fn upsert_link(links: &mut Vec<PortLink>, entity: &str, port: &str, mode: ChannelMode) {
    match links
        .iter_mut()
        .find(|link| link.entity == entity && link.port == port)
    {
        Some(existing) => {
            existing.mode = mode;
            existing.valid = true;
        }
        None => links.push(PortLink {
            entity: entity.to_string(),
            port: port.to_string(),
            mode,
            valid: true,
        }),
    }
}

/// A displayed service or process.
///
/// Created as a copy of the scanned [`EntityData`] the first time its name shows up, then kept
/// (with its position) for as long as scans keep reporting it.
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: ContainerKind,
    pub name: String,
    pub ip_address: String,
    pub behaviour: String,
    pub description: String,
    ports: Vec<Port>,
    visited: bool,
    newly_created: bool,
    node: Option<NodeIndex>,
    position: Position,
    size: Size,
}

impl Entity {
    pub fn from_data(data: &EntityData) -> Self {
        let ports: Vec<Port> = data.ports.iter().map(Port::from_data).collect();
        let size = estimate_size(&data.name, &ports);
        Self {
            kind: data.kind,
            name: data.name.clone(),
            ip_address: data.ip_address.clone(),
            behaviour: data.behaviour.clone(),
            description: data.description.clone(),
            ports,
            visited: false,
            newly_created: false,
            node: None,
            position: Position::ORIGIN,
            size,
        }
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn num_ports(&self) -> usize {
        self.ports.len()
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.name == name)
    }

    pub(crate) fn port_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.ports.iter_mut().find(|port| port.name == name)
    }

    pub(crate) fn ports_mut(&mut self) -> impl Iterator<Item = &mut Port> {
        self.ports.iter_mut()
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn set_visited(&mut self) {
        self.visited = true;
    }

    pub(crate) fn clear_visited(&mut self) {
        self.visited = false;
    }

    pub fn is_new(&self) -> bool {
        self.newly_created
    }

    pub(crate) fn set_newly_created(&mut self, value: bool) {
        self.newly_created = value;
    }

    /// Handle into the layout graph of the pass currently running, if any.
    pub fn node(&self) -> Option<NodeIndex> {
        self.node
    }

    pub(crate) fn set_node(&mut self, node: Option<NodeIndex>) {
        self.node = node;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Replaces the estimated size with the one the renderer actually uses.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }

    /// True if any port has a connection to a port of a different entity, or any input at all.
    pub fn is_connected(&self) -> bool {
        self.ports.iter().any(|port| {
            !port.inputs.is_empty() || port.outputs.iter().any(|link| link.entity != self.name)
        })
    }
}

fn estimate_size(name: &str, ports: &[Port]) -> Size {
    let widest = ports
        .iter()
        .map(|port| port.name.chars().count())
        .chain(std::iter::once(name.chars().count()))
        .max()
        .unwrap_or(0);
    let width = (widest as f32 * CHAR_WIDTH + 2.0 * PADDING).max(MIN_WIDTH);
    let height = (ports.len() + 1) as f32 * ROW_HEIGHT + 2.0 * PADDING;
    Size::new(width, height)
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

    fn sample() -> EntityData {
        let mut data = EntityData::new(ContainerKind::Adapter, "adapter", "relay", "a relay")
            .with_address("10.0.0.7");
        data.add_port(
            PortData::new("/adapter/in", PortUsage::Adapter, PortDirection::Input)
                .with_number(10010)
                .with_protocol("b", "bottle"),
        );
        data.add_port(PortData::new(
            "/adapter/out/long-name",
            PortUsage::Adapter,
            PortDirection::Output,
        ));
        data
    }

    #[test]
    fn from_data_copies_everything() {
        let entity = Entity::from_data(&sample());
        assert_eq!(entity.name, "adapter");
        assert_eq!(entity.kind, ContainerKind::Adapter);
        assert_eq!(entity.ip_address, "10.0.0.7");
        assert_eq!(entity.num_ports(), 2);

        let port = entity.port("/adapter/in").unwrap();
        assert_eq!(port.number, 10010);
        assert_eq!(port.protocol, "b");
        assert_eq!(port.protocol_description, "bottle");
        assert_eq!(port.direction, PortDirection::Input);
        assert!(!entity.is_visited());
        assert!(!entity.is_new());
        assert!(entity.node().is_none());
    }

    #[test]
    fn size_estimate_grows_with_ports_and_names() {
        let entity = Entity::from_data(&sample());
        let bare = Entity::from_data(&EntityData::new(ContainerKind::Plain, "x", "", ""));

        assert!(entity.size().height > bare.size().height);
        assert!(entity.size().width > bare.size().width);
        assert!(bare.size().width >= MIN_WIDTH);
    }

    #[test]
    fn re_adding_a_link_revalidates_it() {
        let mut entity = Entity::from_data(&sample());
        let port = entity.port_mut("/adapter/out/long-name").unwrap();

        port.add_output_connection("other", "/other/in", ChannelMode::Tcp);
        port.invalidate_connections();
        assert!(!port.output_connections()[0].is_valid());

        port.add_output_connection("other", "/other/in", ChannelMode::Udp);
        assert_eq!(port.output_connections().len(), 1);
        assert!(port.output_connections()[0].is_valid());
        assert_eq!(port.output_connections()[0].mode, ChannelMode::Udp);
    }

    #[test]
    fn self_output_does_not_count_as_connected() {
        let mut entity = Entity::from_data(&sample());
        entity
            .port_mut("/adapter/out/long-name")
            .unwrap()
            .add_output_connection("adapter", "/adapter/in", ChannelMode::Tcp);
        assert!(!entity.is_connected());

        entity
            .port_mut("/adapter/in")
            .unwrap()
            .add_input_connection("adapter", "/adapter/out/long-name", ChannelMode::Tcp);
        assert!(entity.is_connected());
    }
}
