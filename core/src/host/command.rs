use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCommand {
    Repaint,
    InvertBackground,
    WhiteBackground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    /// Pressed together with the platform's command modifier.
    pub shortcut: char,
}

impl HostCommand {
    pub const ALL: [HostCommand; 3] = [
        HostCommand::Repaint,
        HostCommand::InvertBackground,
        HostCommand::WhiteBackground,
    ];

    pub fn info(self) -> CommandInfo {
        let (name, description, shortcut) = match self {
            Self::Repaint => ("Repaint", "Trigger a repaint of the window", 'R'),
            Self::InvertBackground => ("Invert", "Invert the background gradient", 'I'),
            Self::WhiteBackground => ("White", "Use a white background", 'B'),
        };
        CommandInfo {
            name,
            description,
            category: "View",
            shortcut,
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.info().shortcut.eq_ignore_ascii_case(&key))
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}
