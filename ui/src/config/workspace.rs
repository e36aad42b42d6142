use serde::Deserialize;
use std::path::Path;

/// File name of the per-workspace override, read from the working directory.
pub const WORKSPACE_FILE: &str = ".themetty.toml";

#[derive(Debug, Deserialize, Default)]
struct WorkspaceFile {
    #[serde(default)]
    sources: WorkspaceSources,
}

#[derive(Debug, Deserialize, Default)]
struct WorkspaceSources {
    base_url: Option<String>,
}

/// Read the base URL override from `.themetty.toml` in the working
/// directory, if there is one.
///
/// Workspace files travel with shared repositories and are untrusted input:
/// this reader honors nothing else in the file, and the returned value still
/// has to pass `runtime::assets::sanitize_base_url` against the user's own
/// trusted registry before any loader is built from it. A file that is
/// missing, unreadable, or malformed reads as "no override".
pub fn read_base_url() -> Option<String> {
    read_base_url_from(Path::new(WORKSPACE_FILE))
}

fn read_base_url_from(path: &Path) -> Option<String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("cannot read {}: {e}", path.display());
            return None;
        }
    };
    match toml::from_str::<WorkspaceFile>(&text) {
        Ok(file) => file.sources.base_url.filter(|url| !url.trim().is_empty()),
        Err(e) => {
            log::warn!("{} is not valid TOML: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_none, assert_some_eq};

    fn write_workspace_file(content: &str) -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(WORKSPACE_FILE), content).unwrap();
        dir
    }

    #[test]
    fn missing_file_reads_as_no_override() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_none!(read_base_url_from(&dir.path().join(WORKSPACE_FILE)));
    }

    #[test]
    fn base_url_is_extracted_from_sources_table() {
        let dir = write_workspace_file(
            r#"
[sources]
base_url = "https://themes.example.org/v2/"
"#,
        );
        assert_some_eq!(
            read_base_url_from(&dir.path().join(WORKSPACE_FILE)),
            "https://themes.example.org/v2/".to_string()
        );
    }

    #[test]
    fn other_keys_are_ignored_entirely() {
        let dir = write_workspace_file(
            r#"
max_concurrent_tasks = 999

[sources]
themes_dir = "/somewhere/else"
"#,
        );
        assert_none!(read_base_url_from(&dir.path().join(WORKSPACE_FILE)));
    }

    #[test]
    fn malformed_toml_reads_as_no_override() {
        let dir = write_workspace_file("[sources\nbase_url = ");
        assert_none!(read_base_url_from(&dir.path().join(WORKSPACE_FILE)));
    }

    #[test]
    fn empty_base_url_reads_as_no_override() {
        let dir = write_workspace_file("[sources]\nbase_url = \"  \"\n");
        assert_none!(read_base_url_from(&dir.path().join(WORKSPACE_FILE)));
    }
}
