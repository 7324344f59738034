use serde::Deserialize;
use std::fmt;

/// An sRGB color used for group labels and inline text formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a color name (`red`, `lightblue`, ...) or a `#rrggbb` hex string.
    ///
    /// Returns `None` for anything else.
    pub fn parse(color_str: &str) -> Option<Color> {
        let color_str = color_str.trim();
        if let Some(hex) = color_str.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let color = match color_str.to_lowercase().as_str() {
            "red" => Color::rgb(205, 0, 0),
            "green" => Color::rgb(0, 205, 0),
            "yellow" => Color::YELLOW,
            "blue" => Color::rgb(0, 0, 238),
            "magenta" => Color::rgb(205, 0, 205),
            "cyan" => Color::rgb(0, 205, 205),
            "white" => Color::WHITE,
            "black" => Color::BLACK,
            "gray" => Color::rgb(190, 190, 190),
            "darkgray" => Color::rgb(127, 127, 127),
            "orange" => Color::rgb(255, 165, 0),
            "lightred" => Color::rgb(255, 85, 85),
            "lightgreen" => Color::rgb(85, 255, 85),
            "lightyellow" => Color::rgb(255, 255, 85),
            "lightblue" => Color::rgb(92, 92, 255),
            "lightmagenta" => Color::rgb(255, 85, 255),
            "lightcyan" => Color::rgb(85, 255, 255),
            _ => return None,
        };
        Some(color)
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb` form, as written into saved HTML.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).ok_or_else(|| format!("unrecognized color '{value}'"))
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or_else(|| format!("unrecognized color '{s}'"))
    }
}

/// Predefined group label colors offered when a group is created.
pub const GROUP_PALETTE: &[Color] = &[
    Color::rgb(255, 255, 255),
    Color::rgb(255, 99, 71),
    Color::rgb(255, 165, 0),
    Color::rgb(255, 215, 0),
    Color::rgb(124, 252, 0),
    Color::rgb(64, 224, 208),
    Color::rgb(30, 144, 255),
    Color::rgb(186, 85, 211),
    Color::rgb(255, 105, 180),
    Color::rgb(169, 169, 169),
];

/// Picks a palette color deterministically from a group name.
pub fn color_for_name(name: &str) -> Color {
    let mut hash: u32 = 5381;
    for byte in name.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u32);
    }
    // Skip white at index 0, it is the default for uncolored groups.
    let index = 1 + (hash as usize) % (GROUP_PALETTE.len() - 1);
    GROUP_PALETTE[index]
}
