//! Asset URL resolution
//!
//! Component markup refers to its assets by relative path. With a base URL
//! configured the path is joined onto it, otherwise it is used as written.

use url::Url;

/// Counter icon, relative to the component module
pub const LOGO_PATH: &str = "../img/logo.png";

/// Resolve relative asset paths against an optional base URL
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    base: Option<Url>,
}

impl AssetResolver {
    /// Create a resolver. An unparsable base is ignored.
    pub fn new(base: Option<&str>) -> Self {
        let base = base.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::warn!("Ignoring asset base {:?}: {}", raw, err);
                None
            }
        });
        Self { base }
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Resolve `relative` against the base
    pub fn resolve(&self, relative: &str) -> String {
        self.base.as_ref()
            .and_then(|base| base.join(relative).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| relative.to_string())
    }

    /// Resolved counter icon
    pub fn logo(&self) -> String {
        self.resolve(LOGO_PATH)
    }
}
