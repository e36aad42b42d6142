use crate::error::{ErrorCode, ReportContext, Reporter};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("asset name '{asset}' is not a plain file name")]
    InvalidAsset { asset: String },
    #[error("asset '{asset}' not found")]
    NotFound { asset: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request for {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// Where palette files come from.
///
/// The loader only ever asks for plain file names ("dracula.toml"); sources
/// decide how to find them. Implementations must reject anything that is
/// not a plain file name.
#[async_trait]
pub trait PaletteSource: Send + Sync {
    async fn fetch(&self, asset: &str) -> Result<String, FetchError>;
}

fn valid_asset_name(asset: &str) -> bool {
    !asset.is_empty()
        && !asset.contains(['/', '\\'])
        && !asset.contains("..")
        && asset.ends_with(".toml")
}

/// Accept or reject a workspace-supplied base URL override.
///
/// Workspace files travel with shared repositories and are not the user's
/// own configuration, so an override must not be able to point the loader
/// at an attacker-controlled host. Rejected values are reported once as
/// `UNTRUSTED_BASE_URL` and the caller falls back to local sources.
///
/// Rules, in order:
/// - empty or whitespace means "no override" and is silently ignored
/// - protocol-relative values (`//cdn.example.com/...`) are rejected
/// - only `https` is accepted, plus `http` for loopback hosts
/// - the origin must equal the trusted origin from the user's own
///   configuration; with no trusted origin configured, every override
///   is rejected
///
/// The returned URL always ends in `/` so asset names append cleanly.
pub fn sanitize_base_url(raw: &str, trusted: Option<&Url>, reporter: &Reporter) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let context = || ReportContext::new("Assets", "sanitize_base_url").with_detail(raw);

    if raw.starts_with("//") {
        reporter.warn(
            ErrorCode::UntrustedBaseUrl,
            context(),
            "protocol-relative base URL rejected",
        );
        return None;
    }

    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            reporter.warn(
                ErrorCode::UntrustedBaseUrl,
                context(),
                format!("base URL does not parse: {e}"),
            );
            return None;
        }
    };

    match url.scheme() {
        "https" => {}
        "http" if is_loopback(&url) => {}
        "http" => {
            reporter.warn(
                ErrorCode::UntrustedBaseUrl,
                context(),
                "plain-http base URL rejected (loopback hosts excepted)",
            );
            return None;
        }
        other => {
            reporter.warn(
                ErrorCode::UntrustedBaseUrl,
                context(),
                format!("unsupported scheme '{other}' in base URL"),
            );
            return None;
        }
    }

    match trusted {
        Some(trusted) if trusted.origin() == url.origin() => {}
        Some(_) => {
            reporter.warn(
                ErrorCode::UntrustedBaseUrl,
                context(),
                "base URL rejected: origin differs from sources.registry_url",
            );
            return None;
        }
        None => {
            reporter.warn(
                ErrorCode::UntrustedBaseUrl,
                context(),
                "base URL rejected: no sources.registry_url configured to trust it against",
            );
            return None;
        }
    }

    url.set_fragment(None);
    url.set_query(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}

/// Parse the user-owned registry URL that overrides are trusted against.
///
/// Lives in the user's config dir, so only the scheme rules apply here.
pub fn parse_trusted_origin(raw: &str, reporter: &Reporter) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let context = || ReportContext::new("Assets", "parse_trusted_origin").with_detail(raw);
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            reporter.warn(
                ErrorCode::UntrustedBaseUrl,
                context(),
                format!("sources.registry_url does not parse: {e}"),
            );
            return None;
        }
    };
    match url.scheme() {
        "https" => Some(url),
        "http" if is_loopback(&url) => Some(url),
        other => {
            reporter.warn(
                ErrorCode::UntrustedBaseUrl,
                context(),
                format!("sources.registry_url must be https (got '{other}')"),
            );
            None
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
        Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
        None => false,
    }
}

/// Palettes from a directory on disk, with the embedded snapshot behind it.
///
/// A file present in the directory wins so users can override any bundled
/// palette; a file that is simply absent falls through to the embedded
/// copy. Real I/O failures surface instead of being masked by the snapshot.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl PaletteSource for DirSource {
    async fn fetch(&self, asset: &str) -> Result<String, FetchError> {
        if !valid_asset_name(asset) {
            return Err(FetchError::InvalidAsset {
                asset: asset.to_string(),
            });
        }
        let path = self.dir.join(asset);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => crate::bundled::palette(asset)
                .map(str::to_string)
                .ok_or_else(|| FetchError::NotFound {
                    asset: asset.to_string(),
                }),
            Err(source) => Err(FetchError::Io { path, source }),
        }
    }
}

/// Palettes served over HTTP from a sanitized base URL.
pub struct HttpSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpSource {
    /// `base` must come out of [`sanitize_base_url`].
    pub fn new(base: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl PaletteSource for HttpSource {
    async fn fetch(&self, asset: &str) -> Result<String, FetchError> {
        if !valid_asset_name(asset) {
            return Err(FetchError::InvalidAsset {
                asset: asset.to_string(),
            });
        }
        let url = self
            .base
            .join(asset)
            .map_err(|_| FetchError::InvalidAsset {
                asset: asset.to_string(),
            })?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                asset: asset.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }
}
