use serde::{Deserialize, Serialize};

/// The role a port plays for its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortUsage {
    Client,
    Service,
    Adapter,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortDirection {
    Input,
    Output,
    InputOutput,
    #[default]
    Unknown,
}

/// One communication endpoint of a scanned entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortData {
    /// Unique across the whole snapshot; connections refer to ports by this name.
    pub name: String,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub protocol_description: String,
    #[serde(default)]
    pub usage: PortUsage,
    #[serde(default)]
    pub direction: PortDirection,
}

impl PortData {
    pub fn new(name: impl Into<String>, usage: PortUsage, direction: PortDirection) -> Self {
        Self {
            name: name.into(),
            usage,
            direction,
            ..Self::default()
        }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }

    pub fn with_protocol(
        mut self,
        protocol: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.protocol = protocol.into();
        self.protocol_description = description.into();
        self
    }
}
