use std::path::PathBuf;

use serde::Deserialize;

/// Documentation assets served next to the admin API
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticAssetsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Directory holding `admin.html`, `admin.yaml`, and `dist/`
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// `max-age` of the `Cache-Control` header, in seconds
    #[serde(default = "default_max_age")]
    pub max_age: u64,
}

impl Default for StaticAssetsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            root: default_root(),
            max_age: default_max_age(),
        }
    }
}

impl StaticAssetsConfig {
    /// Whether `path` is handled by the asset routes
    pub fn serves(&self, path: &str) -> bool {
        self.enabled && (matches!(path, "/admin.html" | "/admin.yaml" | "/dist") || path.starts_with("/dist/"))
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_root() -> PathBuf {
    PathBuf::from("/docs")
}

const fn default_max_age() -> u64 {
    3600
}
