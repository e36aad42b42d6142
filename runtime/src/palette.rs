use serde::{Deserialize, Serialize};

/// Parsed form of one palette token value.
///
/// Unknown or malformed values degrade to `Default` so a hand-edited palette
/// file can never break rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenColor {
    /// Terminal default.
    Default,
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    DarkGray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
}

/// The fixed token set every palette file is expected to define.
///
/// Values are kept as strings; they are parsed at render time so a palette
/// with a bad value still loads and the bad token falls back to the terminal
/// default. Missing tokens deserialize to empty strings for the same reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteColors {
    pub background: String,
    pub surface: String,
    pub overlay: String,
    pub text: String,
    pub subtext: String,
    pub muted: String,
    pub border: String,
    pub accent: String,
    pub accent_alt: String,
    pub highlight: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub name: String,
    pub colors: PaletteColors,
}

impl Palette {
    pub fn parse(source: &str) -> Result<Palette, toml::de::Error> {
        toml::from_str(source)
    }
}

/// Convert a palette token value to a color.
///
/// Accepts `#rgb` and `#rrggbb` hex plus a small named-color set; everything
/// else (including the empty string and `"reset"`) is the terminal default.
pub fn parse_color(value: &str) -> TokenColor {
    if value.is_empty() || value.eq_ignore_ascii_case("reset") {
        return TokenColor::Default;
    }

    match value.to_lowercase().as_str() {
        "black" => TokenColor::Named(NamedColor::Black),
        "red" => TokenColor::Named(NamedColor::Red),
        "green" => TokenColor::Named(NamedColor::Green),
        "yellow" => TokenColor::Named(NamedColor::Yellow),
        "blue" => TokenColor::Named(NamedColor::Blue),
        "magenta" => TokenColor::Named(NamedColor::Magenta),
        "cyan" => TokenColor::Named(NamedColor::Cyan),
        "white" => TokenColor::Named(NamedColor::White),
        "gray" | "grey" => TokenColor::Named(NamedColor::Gray),
        "darkgray" | "darkgrey" => TokenColor::Named(NamedColor::DarkGray),
        "lightred" => TokenColor::Named(NamedColor::LightRed),
        "lightgreen" => TokenColor::Named(NamedColor::LightGreen),
        "lightyellow" => TokenColor::Named(NamedColor::LightYellow),
        "lightblue" => TokenColor::Named(NamedColor::LightBlue),
        "lightmagenta" => TokenColor::Named(NamedColor::LightMagenta),
        "lightcyan" => TokenColor::Named(NamedColor::LightCyan),
        other => match parse_hex(other) {
            Some((r, g, b)) => TokenColor::Rgb(r, g, b),
            None => TokenColor::Default,
        },
    }
}

fn parse_hex(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some((r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}
