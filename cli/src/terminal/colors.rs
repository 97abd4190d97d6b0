use colored::Color;

pub const PRIMARY: Color = Color::TrueColor {
    r: 102,
    g: 204,
    b: 255,
};
pub const ACCENT: Color = Color::TrueColor {
    r: 255,
    g: 179,
    b: 71,
};
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const SERVICE: Color = Color::Green;
pub const ADAPTER: Color = Color::Magenta;
pub const PLAIN: Color = Color::Cyan;
pub const PORT_NAME: Color = Color::TrueColor {
    r: 180,
    g: 180,
    b: 220,
};
pub const POSITION: Color = Color::Yellow;
pub const ADDED: Color = Color::Green;
pub const REMOVED: Color = Color::Red;
