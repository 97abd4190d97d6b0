use std::fmt;

use chanman_common::geometry::{Position, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const DARK_GREY: Colour = Colour::from_rgb(0xA9A9A9);
    pub const LIGHT_GREY: Colour = Colour::from_rgb(0xD3D3D3);

    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundFill {
    Solid(Colour),
    /// `inner` at `centre`, fading to `outer` at `edge`.
    RadialGradient {
        centre: Position,
        inner: Colour,
        edge: Position,
        outer: Colour,
    },
}

/// The two cosmetic background toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Background {
    invert: bool,
    white: bool,
}

impl Background {
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Named after the command that toggles it; the plain fill is actually a grey.
    pub fn is_white(&self) -> bool {
        self.white
    }

    pub fn toggle_invert(&mut self) {
        self.invert = !self.invert;
    }

    pub fn toggle_white(&mut self) {
        self.white = !self.white;
    }

    pub fn fill(&self, area: Size) -> BackgroundFill {
        let (first, second) = if self.invert {
            (Colour::DARK_GREY, Colour::LIGHT_GREY)
        } else {
            (Colour::LIGHT_GREY, Colour::DARK_GREY)
        };

        if self.white {
            return BackgroundFill::Solid(first);
        }

        let edge = if area.height > area.width {
            Position::new(0.0, area.height)
        } else {
            Position::new(area.width, 0.0)
        };
        BackgroundFill::RadialGradient {
            centre: Position::new(area.width / 2.0, area.height / 2.0),
            inner: first,
            edge,
            outer: second,
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
