use std::collections::HashMap;

/// Catalog manifest embedded in the binary.
///
/// This is a snapshot of the token build pipeline output under `themes/`;
/// files installed in the user themes directory override it.
pub const CATALOG: &str = include_str!("../../themes/catalog.toml");

/// The protected core palette, loaded at boot and never evicted.
pub const CORE_PALETTE: &str = include_str!("../../themes/core.toml");

/// Palette files embedded in the binary, keyed by asset name.
pub fn palettes() -> HashMap<&'static str, &'static str> {
    let mut palettes = HashMap::new();
    palettes.insert(
        "catppuccin-latte.toml",
        include_str!("../../themes/catppuccin-latte.toml"),
    );
    palettes.insert(
        "catppuccin-frappe.toml",
        include_str!("../../themes/catppuccin-frappe.toml"),
    );
    palettes.insert(
        "catppuccin-macchiato.toml",
        include_str!("../../themes/catppuccin-macchiato.toml"),
    );
    palettes.insert(
        "catppuccin-mocha.toml",
        include_str!("../../themes/catppuccin-mocha.toml"),
    );

    palettes.insert("dracula.toml", include_str!("../../themes/dracula.toml"));

    palettes.insert(
        "gruvbox-dark.toml",
        include_str!("../../themes/gruvbox-dark.toml"),
    );
    palettes.insert(
        "gruvbox-light.toml",
        include_str!("../../themes/gruvbox-light.toml"),
    );

    palettes.insert("nord.toml", include_str!("../../themes/nord.toml"));

    palettes.insert(
        "tokyonight-night.toml",
        include_str!("../../themes/tokyonight-night.toml"),
    );
    palettes.insert(
        "tokyonight-storm.toml",
        include_str!("../../themes/tokyonight-storm.toml"),
    );
    palettes.insert(
        "tokyonight-day.toml",
        include_str!("../../themes/tokyonight-day.toml"),
    );

    palettes.insert(
        "solarized-dark.toml",
        include_str!("../../themes/solarized-dark.toml"),
    );
    palettes.insert(
        "solarized-light.toml",
        include_str!("../../themes/solarized-light.toml"),
    );

    palettes.insert(
        "rose-pine.toml",
        include_str!("../../themes/rose-pine.toml"),
    );
    palettes.insert(
        "rose-pine-moon.toml",
        include_str!("../../themes/rose-pine-moon.toml"),
    );
    palettes.insert(
        "rose-pine-dawn.toml",
        include_str!("../../themes/rose-pine-dawn.toml"),
    );

    palettes.insert(
        "everforest-dark.toml",
        include_str!("../../themes/everforest-dark.toml"),
    );
    palettes.insert(
        "everforest-light.toml",
        include_str!("../../themes/everforest-light.toml"),
    );

    palettes.insert(
        "kanagawa-wave.toml",
        include_str!("../../themes/kanagawa-wave.toml"),
    );

    palettes.insert("nightfox.toml", include_str!("../../themes/nightfox.toml"));
    palettes.insert("dayfox.toml", include_str!("../../themes/dayfox.toml"));

    palettes
}

/// Look up one embedded palette by asset name.
pub fn palette(asset: &str) -> Option<&'static str> {
    if asset == "core.toml" {
        return Some(CORE_PALETTE);
    }
    palettes().get(asset).copied()
}
