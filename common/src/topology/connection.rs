use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport used by a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelMode {
    #[default]
    Tcp,
    Udp,
    Any,
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// A directed edge seen by the scanner, named by its two port names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    pub out_port_name: String,
    pub in_port_name: String,
    #[serde(default)]
    pub mode: ChannelMode,
}
