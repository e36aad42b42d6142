use crate::catalog::ThemeCatalog;

/// Outcome of resolving a requested theme id against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The id to apply. Always names a catalog entry.
    pub id: String,
    /// The rejected input when the request fell back to the default.
    /// `None` when the input was valid or absent.
    pub fallback_from: Option<String>,
}

impl Resolved {
    /// True when the requested id was unusable and the default stood in.
    pub fn fell_back(&self) -> bool {
        self.fallback_from.is_some()
    }
}

/// Decide which theme id to apply for a requested or persisted value.
///
/// Pure and total: no logging, no storage access, no failure mode. Callers
/// that care about a rejected input inspect [`Resolved::fallback_from`] and
/// report it themselves.
///
/// An absent input is not an error. First runs have nothing persisted and
/// quietly land on the catalog default.
pub fn resolve_requested(requested: Option<&str>, catalog: &ThemeCatalog) -> Resolved {
    match requested {
        Some(id) if catalog.contains(id) => Resolved {
            id: id.to_string(),
            fallback_from: None,
        },
        Some(id) => Resolved {
            id: catalog.default_id().to_string(),
            fallback_from: Some(id.to_string()),
        },
        None => Resolved {
            id: catalog.default_id().to_string(),
            fallback_from: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ThemeCatalog;
    use claims::{assert_none, assert_some_eq};
    use proptest::prelude::*;

    const MANIFEST: &str = r#"
default = "catppuccin-mocha"

[[themes]]
id = "catppuccin-mocha"
label = "Catppuccin Mocha"
family = "Catppuccin"
appearance = "dark"

[[themes]]
id = "dracula"
label = "Dracula"
family = "Dracula"
appearance = "dark"

[[themes]]
id = "gruvbox-light"
label = "Gruvbox Light"
family = "Gruvbox"
appearance = "light"
"#;

    fn catalog() -> ThemeCatalog {
        ThemeCatalog::from_manifest(MANIFEST, &crate::error::Reporter::log_only()).unwrap()
    }

    #[test]
    fn valid_ids_resolve_to_themselves() {
        let catalog = catalog();
        for theme in catalog.themes() {
            let resolved = resolve_requested(Some(&theme.id), &catalog);
            assert_eq!(resolved.id, theme.id);
            assert_none!(resolved.fallback_from);
        }
    }

    #[test]
    fn unknown_id_falls_back_to_the_default() {
        let catalog = catalog();
        let resolved = resolve_requested(Some("not-a-real-theme"), &catalog);
        assert_eq!(resolved.id, "catppuccin-mocha");
        assert_some_eq!(resolved.fallback_from.as_deref(), "not-a-real-theme");
        assert!(resolved.fell_back());
    }

    #[test]
    fn absent_input_is_the_default_without_fallback() {
        let catalog = catalog();
        let resolved = resolve_requested(None, &catalog);
        assert_eq!(resolved.id, "catppuccin-mocha");
        assert_none!(resolved.fallback_from);
    }

    #[test]
    fn empty_string_is_not_a_theme() {
        let catalog = catalog();
        let resolved = resolve_requested(Some(""), &catalog);
        assert_eq!(resolved.id, "catppuccin-mocha");
        assert!(resolved.fell_back());
    }

    proptest! {
        // Resolution never leaves the catalog and is idempotent for any input.
        #[test]
        fn resolution_stays_inside_the_catalog(raw in "[a-z0-9_-]{0,24}") {
            let catalog = catalog();
            let resolved = resolve_requested(Some(&raw), &catalog);
            prop_assert!(catalog.contains(&resolved.id));
            let again = resolve_requested(Some(&resolved.id), &catalog);
            prop_assert_eq!(&again.id, &resolved.id);
            prop_assert!(again.fallback_from.is_none());
        }
    }
}
