use crate::terminal::colors;
use chanman_common::geometry::Position;
use chanman_common::topology::{ContainerKind, PortDirection};
use chanman_core::panel::{Entity, Port};
use colored::*;

pub type Detail = (String, ColoredString);

pub fn kind_to_str(kind: ContainerKind) -> ColoredString {
    match kind {
        ContainerKind::Service => "service".color(colors::SERVICE),
        ContainerKind::Adapter => "adapter".color(colors::ADAPTER),
        ContainerKind::Plain => "plain".color(colors::PLAIN),
    }
}

pub fn position_to_str(position: Position) -> ColoredString {
    position.to_string().color(colors::POSITION)
}

fn direction_to_str(direction: PortDirection) -> &'static str {
    match direction {
        PortDirection::Input => "in",
        PortDirection::Output => "out",
        PortDirection::InputOutput => "in/out",
        PortDirection::Unknown => "?",
    }
}

fn port_to_detail(port: &Port) -> Detail {
    let links: Vec<String> = port
        .output_connections()
        .iter()
        .map(|link| format!("→ {} ({})", link.port, link.mode))
        .chain(
            port.input_connections()
                .iter()
                .map(|link| format!("← {} ({})", link.port, link.mode)),
        )
        .collect();

    let mut value: String = format!(
        "{} [{}]",
        port.name.color(colors::PORT_NAME),
        direction_to_str(port.direction)
    );
    if !links.is_empty() {
        value.push_str(&format!(" {}", links.join(", ").color(colors::SEPARATOR)));
    }
    ("Port".to_string(), value.normal())
}

/// `name @ (x, y)`
pub fn entity_head(entity: &Entity) -> String {
    format!(
        "{} {} {}",
        entity.name.color(colors::PRIMARY),
        "@".color(colors::SEPARATOR),
        position_to_str(entity.position())
    )
}

pub fn entity_to_details(entity: &Entity) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![("Kind".to_string(), kind_to_str(entity.kind))];

    if !entity.ip_address.is_empty() {
        details.push(("Address".to_string(), entity.ip_address.normal()));
    }
    if !entity.behaviour.is_empty() {
        details.push(("Behaviour".to_string(), entity.behaviour.normal()));
    }

    details.extend(entity.ports().iter().map(port_to_detail));
    details
}

pub fn names_to_str(names: &[String], color: Color) -> ColoredString {
    names.join(", ").color(color)
}
