//! # Scanned Topology Model
//!
//! The snapshot a background scan hands to the display: every entity (a service or process)
//! that was observed, the ports it owns, and the connections seen between those ports.
//!
//! Entity names are unique within one snapshot, and port names are unique across the whole
//! snapshot because connections refer to ports by name alone. [`TopologyModel::add_entity`]
//! enforces both; a snapshot deserialized from elsewhere can be checked with
//! [`TopologyModel::validate`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod connection;
mod entity;
mod port;

pub use connection::{ChannelMode, ConnectionDetails};
pub use entity::{ContainerKind, EntityData};
pub use port::{PortData, PortDirection, PortUsage};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("entity '{0}' appears more than once in the snapshot")]
    DuplicateEntity(String),
    #[error("port '{port}' of entity '{entity}' is already owned by another entity")]
    DuplicatePort { entity: String, port: String },
    #[error("entity name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyModel {
    #[serde(default)]
    entities: Vec<EntityData>,
    #[serde(default)]
    connections: Vec<ConnectionDetails>,
}

impl TopologyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entity, rejecting names or port names the snapshot already contains.
    pub fn add_entity(&mut self, entity: EntityData) -> Result<(), TopologyError> {
        if entity.name.is_empty() {
            return Err(TopologyError::EmptyName);
        }
        if self.find_entity(&entity.name).is_some() {
            return Err(TopologyError::DuplicateEntity(entity.name));
        }
        for port in &entity.ports {
            if self.find_port(&port.name).is_some() {
                return Err(TopologyError::DuplicatePort {
                    entity: entity.name.clone(),
                    port: port.name.clone(),
                });
            }
        }
        self.entities.push(entity);
        Ok(())
    }

    pub fn add_connection(
        &mut self,
        out_port_name: impl Into<String>,
        in_port_name: impl Into<String>,
        mode: ChannelMode,
    ) {
        self.connections.push(ConnectionDetails {
            out_port_name: out_port_name.into(),
            in_port_name: in_port_name.into(),
            mode,
        });
    }

    pub fn entities(&self) -> &[EntityData] {
        &self.entities
    }

    pub fn connections(&self) -> &[ConnectionDetails] {
        &self.connections
    }

    pub fn number_of_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.connections.is_empty()
    }

    pub fn find_entity(&self, name: &str) -> Option<&EntityData> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    /// Finds a port by its topology-wide name, together with the entity that owns it.
    pub fn find_port(&self, port_name: &str) -> Option<(&EntityData, &PortData)> {
        self.entities.iter().find_map(|entity| {
            entity
                .ports
                .iter()
                .find(|port| port.name == port_name)
                .map(|port| (entity, port))
        })
    }

    /// Checks the uniqueness rules that [`TopologyModel::add_entity`] enforces on insertion.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let mut entity_names: HashSet<&str> = HashSet::new();
        let mut port_names: HashSet<&str> = HashSet::new();

        for entity in &self.entities {
            if entity.name.is_empty() {
                return Err(TopologyError::EmptyName);
            }
            if !entity_names.insert(&entity.name) {
                return Err(TopologyError::DuplicateEntity(entity.name.clone()));
            }
            for port in &entity.ports {
                if !port_names.insert(&port.name) {
                    return Err(TopologyError::DuplicatePort {
                        entity: entity.name.clone(),
                        port: port.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.connections.clear();
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
