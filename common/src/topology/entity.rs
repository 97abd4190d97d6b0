use serde::{Deserialize, Serialize};

use super::port::PortData;

/// What sort of process an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    #[default]
    Plain,
    Service,
    Adapter,
}

/// One discovered service or process, exactly as the scanner saw it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub name: String,
    #[serde(default)]
    pub kind: ContainerKind,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub behaviour: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ports: Vec<PortData>,
}

impl EntityData {
    pub fn new(
        kind: ContainerKind,
        name: impl Into<String>,
        behaviour: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            ip_address: String::new(),
            behaviour: behaviour.into(),
            description: description.into(),
            ports: Vec::new(),
        }
    }

    pub fn with_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = ip_address.into();
        self
    }

    pub fn add_port(&mut self, port: PortData) -> &mut PortData {
        self.ports.push(port);
        let last = self.ports.len() - 1;
        &mut self.ports[last]
    }

    pub fn num_ports(&self) -> usize {
        self.ports.len()
    }

    pub fn port(&self, num: usize) -> Option<&PortData> {
        self.ports.get(num)
    }
}
