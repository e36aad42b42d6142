use crate::error::{ErrorCode, ReportContext, Reporter};
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Light or dark classification of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

/// Swatch colors for menu previews. Display only, never required for
/// correctness; missing entries render as terminal defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewColors {
    pub background: String,
    pub surface: String,
    pub accent: String,
    pub text: String,
}

/// One catalog entry. Immutable once the catalog is built.
///
/// `id` is the identity key used everywhere: the persisted value, the root
/// theme marker, palette registry entries, and menu item keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    pub id: String,
    pub label: String,
    pub family: String,
    pub appearance: Appearance,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub preview: PreviewColors,
}

impl ThemeDescriptor {
    /// Palette file name, derived deterministically from the id.
    pub fn asset(&self) -> String {
        format!("{}.toml", self.id)
    }

    /// Glyph shown on the trigger and next to menu items. Descriptors
    /// without an icon fall back to a generated two-letter glyph.
    pub fn glyph(&self) -> String {
        match &self.icon {
            Some(icon) if !icon.is_empty() => icon.clone(),
            _ => two_letter_glyph(&self.label),
        }
    }
}

fn two_letter_glyph(label: &str) -> String {
    let mut words = label.split_whitespace();
    let glyph: String = match (words.next(), words.next()) {
        (Some(first), Some(second)) => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect(),
        (Some(first), None) => first.chars().take(2).flat_map(char::to_uppercase).collect(),
        _ => String::new(),
    };
    if glyph.is_empty() { "??".to_string() } else { glyph }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog manifest is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog has no themes")]
    Empty,
    #[error("duplicate theme id '{id}' in catalog")]
    DuplicateId { id: String },
    #[error("default theme '{id}' is not in the catalog")]
    UnknownDefault { id: String },
}

/// Validator for theme ids.
///
/// Ids double as palette file stems, so the rules are strict: lowercase
/// alphanumeric, hyphens and underscores, no leading or trailing separator,
/// and never the reserved core id.
pub struct ThemeIdValidator;

impl Validator<str> for ThemeIdValidator {
    type Error = String;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.is_empty() {
            return Err("id cannot be empty".to_string());
        }
        if input.len() > 50 {
            return Err("id too long (max 50 characters)".to_string());
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(
                "id contains invalid characters (lowercase alphanumeric, hyphens, and underscores only)"
                    .to_string(),
            );
        }
        if input.starts_with(['-', '_']) || input.ends_with(['-', '_']) {
            return Err("id cannot start or end with hyphens or underscores".to_string());
        }
        if input == crate::loader::CORE_PALETTE_ID {
            return Err("id collides with the protected core palette".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    default: String,
    #[serde(default)]
    themes: Vec<ThemeDescriptor>,
}

/// The static theme registry.
///
/// Built once at startup from the bundled manifest and owned by the runtime
/// instance; read-only thereafter. Entries are kept in render order: grouped
/// by family, families in first-appearance order, themes within a family in
/// manifest order.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<ThemeDescriptor>,
    index: HashMap<String, usize>,
    families: Vec<String>,
    default_id: String,
}

impl ThemeCatalog {
    /// Build the catalog from the embedded manifest.
    pub fn bundled(reporter: &Reporter) -> Result<Self, CatalogError> {
        Self::from_manifest(crate::bundled::CATALOG, reporter)
    }

    /// A catalog with nothing in it.
    ///
    /// Applying against it reports `CATALOG_EMPTY` and mutates nothing.
    /// Hosts hold one as a placeholder when the real catalog failed to
    /// build and the process is on its way down.
    pub fn empty() -> Self {
        Self {
            themes: Vec::new(),
            index: HashMap::new(),
            families: Vec::new(),
            default_id: String::new(),
        }
    }

    /// Build the catalog from a manifest string.
    ///
    /// Entries with unusable ids are dropped with a warning; they could
    /// never map to a palette file. Duplicates and an unknown default are
    /// manifest bugs and fail the build outright.
    pub fn from_manifest(source: &str, reporter: &Reporter) -> Result<Self, CatalogError> {
        let manifest: Manifest = toml::from_str(source)?;

        let validator = ThemeIdValidator;
        let mut kept: Vec<ThemeDescriptor> = Vec::with_capacity(manifest.themes.len());
        for descriptor in manifest.themes {
            match validator.validate(&descriptor.id) {
                Ok(()) => kept.push(descriptor),
                Err(reason) => reporter.warn(
                    ErrorCode::InvalidResourcePath,
                    ReportContext::new("ThemeCatalog", "from_manifest")
                        .with_detail(&descriptor.id),
                    format!("dropping theme '{}': {reason}", descriptor.id),
                ),
            }
        }

        if kept.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut families: Vec<String> = Vec::new();
        for descriptor in &kept {
            if !families.contains(&descriptor.family) {
                families.push(descriptor.family.clone());
            }
        }

        let mut themes: Vec<ThemeDescriptor> = Vec::with_capacity(kept.len());
        for family in &families {
            themes.extend(kept.iter().filter(|t| &t.family == family).cloned());
        }

        let mut index = HashMap::with_capacity(themes.len());
        for (position, descriptor) in themes.iter().enumerate() {
            if index.insert(descriptor.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: descriptor.id.clone(),
                });
            }
        }

        if !index.contains_key(&manifest.default) {
            return Err(CatalogError::UnknownDefault {
                id: manifest.default,
            });
        }

        Ok(Self {
            themes,
            index,
            families,
            default_id: manifest.default,
        })
    }

    /// All descriptors in stable render order.
    pub fn themes(&self) -> &[ThemeDescriptor] {
        &self.themes
    }

    /// Family names in declared order.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn resolve(&self, id: &str) -> Option<&ThemeDescriptor> {
        self.index.get(id).map(|&position| &self.themes[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of an id in render order. Used to keep index-addressed
    /// surfaces (the select) in step with the catalog.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Reporter;
    use claims::{assert_err, assert_matches, assert_none, assert_ok, assert_some};
    use std::sync::mpsc;

    fn manifest(body: &str) -> String {
        format!("default = \"alpha-dark\"\n{body}")
    }

    const BASE_THEMES: &str = r#"
[[themes]]
id = "alpha-dark"
label = "Alpha Dark"
family = "Alpha"
appearance = "dark"

[[themes]]
id = "beta-dark"
label = "Beta Dark"
family = "Beta"
appearance = "dark"
icon = "🦇"

[[themes]]
id = "alpha-light"
label = "Alpha Light"
family = "Alpha"
appearance = "light"
"#;

    #[test]
    fn groups_interleaved_families_in_declared_order() {
        let catalog = assert_ok!(ThemeCatalog::from_manifest(
            &manifest(BASE_THEMES),
            &Reporter::log_only()
        ));

        let order: Vec<&str> = catalog.themes().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["alpha-dark", "alpha-light", "beta-dark"]);
        assert_eq!(catalog.families(), &["Alpha".to_string(), "Beta".to_string()]);
        assert_eq!(catalog.position("beta-dark"), Some(2));
    }

    #[test]
    fn resolve_finds_known_ids_only() {
        let catalog = assert_ok!(ThemeCatalog::from_manifest(
            &manifest(BASE_THEMES),
            &Reporter::log_only()
        ));

        let descriptor = assert_some!(catalog.resolve("beta-dark"));
        assert_eq!(descriptor.label, "Beta Dark");
        assert_matches!(descriptor.appearance, Appearance::Dark);
        assert_none!(catalog.resolve("gamma"));
        assert!(!catalog.contains("gamma"));
    }

    #[test]
    fn empty_manifest_is_an_error() {
        let err = assert_err!(ThemeCatalog::from_manifest(
            "default = \"x\"\nthemes = []\n",
            &Reporter::log_only()
        ));
        assert_matches!(err, CatalogError::Empty);
    }

    #[test]
    fn duplicate_ids_fail_the_build() {
        let doubled = format!("{BASE_THEMES}\n{}",
            r#"
[[themes]]
id = "alpha-dark"
label = "Alpha Dark Again"
family = "Alpha"
appearance = "dark"
"#);
        let err = assert_err!(ThemeCatalog::from_manifest(
            &manifest(&doubled),
            &Reporter::log_only()
        ));
        assert_matches!(err, CatalogError::DuplicateId { .. });
    }

    #[test]
    fn unknown_default_fails_the_build() {
        let source = format!("default = \"missing\"\n{BASE_THEMES}");
        let err = assert_err!(ThemeCatalog::from_manifest(&source, &Reporter::log_only()));
        assert_matches!(err, CatalogError::UnknownDefault { .. });
    }

    #[test]
    fn unusable_ids_are_dropped_with_a_warning() {
        let source = format!("{}\n{}", manifest(BASE_THEMES), r#"
[[themes]]
id = "../escape"
label = "Escape"
family = "Evil"
appearance = "dark"
"#);
        let (tx, rx) = mpsc::channel();
        let catalog = assert_ok!(ThemeCatalog::from_manifest(&source, &Reporter::new(tx)));

        assert_eq!(catalog.len(), 3);
        assert!(!catalog.contains("../escape"));
        let report = assert_ok!(rx.try_recv());
        assert_matches!(report.code, ErrorCode::InvalidResourcePath);
    }

    #[test]
    fn core_id_is_reserved() {
        let validator = ThemeIdValidator;
        assert_err!(validator.validate("core"));
        assert_ok!(validator.validate("coreline"));
    }

    #[test]
    fn asset_name_derives_from_id() {
        let catalog = assert_ok!(ThemeCatalog::from_manifest(
            &manifest(BASE_THEMES),
            &Reporter::log_only()
        ));
        let descriptor = assert_some!(catalog.resolve("alpha-dark"));
        assert_eq!(descriptor.asset(), "alpha-dark.toml");
    }

    #[test]
    fn glyph_prefers_icon_then_two_letter_fallback() {
        let catalog = assert_ok!(ThemeCatalog::from_manifest(
            &manifest(BASE_THEMES),
            &Reporter::log_only()
        ));

        assert_eq!(assert_some!(catalog.resolve("beta-dark")).glyph(), "🦇");
        assert_eq!(assert_some!(catalog.resolve("alpha-dark")).glyph(), "AD");
    }

    #[test]
    fn single_word_labels_take_two_letters() {
        assert_eq!(two_letter_glyph("Dracula"), "DR");
        assert_eq!(two_letter_glyph("Nord Aurora"), "NA");
        assert_eq!(two_letter_glyph(""), "??");
    }
}
