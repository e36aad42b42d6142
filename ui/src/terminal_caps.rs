use std::fmt;
use std::sync::OnceLock;

/// Color depth the renderer may assume for the current terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    /// 24-bit RGB escape sequences are understood.
    TrueColor,
    /// The 256-color indexed palette.
    Ansi256,
    /// The 16 base colors only.
    Ansi16,
}

impl fmt::Display for ColorDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColorDepth::TrueColor => "truecolor",
            ColorDepth::Ansi256 => "256-color",
            ColorDepth::Ansi16 => "16-color",
        };
        write!(f, "{label}")
    }
}

static PROBED: OnceLock<ColorDepth> = OnceLock::new();

/// Probe the terminal once at startup; later calls return the cached answer.
///
/// Palettes carry RGB values either way. This records what the terminal
/// advertised so the log explains washed-out colors, and so a renderer
/// switch has somewhere to ask.
pub fn color_depth() -> ColorDepth {
    *PROBED.get_or_init(|| {
        detect_from(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    })
}

fn detect_from(colorterm: Option<&str>, term: Option<&str>) -> ColorDepth {
    if let Some(colorterm) = colorterm {
        let colorterm = colorterm.to_ascii_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorDepth::TrueColor;
        }
    }
    match term {
        // "-direct" terminfo entries speak RGB without setting COLORTERM.
        Some(term) if term.ends_with("direct") => ColorDepth::TrueColor,
        Some(term) if term.contains("256color") => ColorDepth::Ansi256,
        _ => ColorDepth::Ansi16,
    }
}
