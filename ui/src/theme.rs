use once_cell::sync::OnceCell;
use runtime::palette::{self, NamedColor, Palette, TokenColor};
use std::sync::{Arc, Mutex};
use tuirealm::props::Color;

// Global painter instance, wrapped in a Mutex so applies can swap the
// palette while components keep reading through the static accessors.
static GLOBAL_PAINTER: OnceCell<Mutex<ThemePainter>> = OnceCell::new();

// Used before the first palette is installed or under lock contention.
mod fallback_colors {
    use tuirealm::props::Color;

    pub const BACKGROUND: Color = Color::Reset;
    pub const SURFACE: Color = Color::Reset;
    pub const OVERLAY: Color = Color::DarkGray;
    pub const TEXT: Color = Color::White;
    pub const SUBTEXT: Color = Color::Gray;
    pub const MUTED: Color = Color::DarkGray;
    pub const BORDER: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Cyan;
    pub const ACCENT_ALT: Color = Color::LightCyan;
    pub const HIGHLIGHT: Color = Color::Magenta;
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
    pub const INFO: Color = Color::Blue;
}

/// Holds the palette every widget paints with.
///
/// The runtime owns which palette is active; the painter is the render-side
/// mirror, swapped on every completed apply. Accessors never block the draw
/// loop: contention or a missing install falls back to a built-in color.
pub struct ThemePainter {
    active: Arc<Palette>,
}

impl ThemePainter {
    /// Install a palette as the one every accessor reads.
    ///
    /// First call initializes the global painter; later calls swap the
    /// palette in place.
    pub fn install(palette: Palette) {
        let cell = GLOBAL_PAINTER.get_or_init(|| {
            Mutex::new(ThemePainter {
                active: Arc::new(Palette::default()),
            })
        });
        match cell.lock() {
            Ok(mut painter) => {
                log::debug!("Painter switched to palette '{}'", palette.name);
                painter.active = Arc::new(palette);
            }
            Err(_) => log::error!("Painter lock poisoned; palette not swapped"),
        }
    }

    /// Name of the palette currently installed, for the status line.
    pub fn active_name() -> String {
        Self::with_painter(|p| p.name.clone(), String::new())
    }

    /// Snapshot of the installed palette for components that render the
    /// whole token set (the preview).
    pub fn active_palette() -> Arc<Palette> {
        Self::with_painter(Arc::clone, Arc::new(Palette::default()))
    }

    fn with_painter<F, R>(f: F, fallback: R) -> R
    where
        F: FnOnce(&Arc<Palette>) -> R,
    {
        match GLOBAL_PAINTER.get() {
            Some(cell) => match cell.try_lock() {
                Ok(painter) => f(&painter.active),
                Err(_) => {
                    log::warn!("Painter lock contention, using fallback");
                    fallback
                }
            },
            None => fallback,
        }
    }

    fn get_color<F>(token_getter: F, fallback: Color) -> Color
    where
        F: FnOnce(&Palette) -> &str,
    {
        Self::with_painter(
            |active| match palette::parse_color(token_getter(active)) {
                TokenColor::Default => fallback,
                token => token_to_color(token),
            },
            fallback,
        )
    }
}

/// Map a parsed palette token onto a terminal color.
pub fn token_to_color(token: TokenColor) -> Color {
    match token {
        TokenColor::Default => Color::Reset,
        TokenColor::Rgb(r, g, b) => Color::Rgb(r, g, b),
        TokenColor::Named(named) => match named {
            NamedColor::Black => Color::Black,
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Cyan => Color::Cyan,
            NamedColor::White => Color::White,
            NamedColor::Gray => Color::Gray,
            NamedColor::DarkGray => Color::DarkGray,
            NamedColor::LightRed => Color::LightRed,
            NamedColor::LightGreen => Color::LightGreen,
            NamedColor::LightYellow => Color::LightYellow,
            NamedColor::LightBlue => Color::LightBlue,
            NamedColor::LightMagenta => Color::LightMagenta,
            NamedColor::LightCyan => Color::LightCyan,
        },
    }
}

// Generate the token accessor methods with fallbacks.
macro_rules! palette_accessor {
    ($method:ident, $token:ident, $fallback:expr) => {
        impl ThemePainter {
            pub fn $method() -> Color {
                Self::get_color(|palette| palette.colors.$token.as_str(), $fallback)
            }
        }
    };
}

palette_accessor!(background, background, fallback_colors::BACKGROUND);
palette_accessor!(surface, surface, fallback_colors::SURFACE);
palette_accessor!(overlay, overlay, fallback_colors::OVERLAY);
palette_accessor!(text, text, fallback_colors::TEXT);
palette_accessor!(subtext, subtext, fallback_colors::SUBTEXT);
palette_accessor!(muted, muted, fallback_colors::MUTED);
palette_accessor!(border, border, fallback_colors::BORDER);
palette_accessor!(accent, accent, fallback_colors::ACCENT);
palette_accessor!(accent_alt, accent_alt, fallback_colors::ACCENT_ALT);
palette_accessor!(highlight, highlight, fallback_colors::HIGHLIGHT);
palette_accessor!(success, success, fallback_colors::SUCCESS);
palette_accessor!(warning, warning, fallback_colors::WARNING);
palette_accessor!(error, error, fallback_colors::ERROR);
palette_accessor!(info, info, fallback_colors::INFO);
