use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".tiff", ".png"];

/// Case-insensitive set of extensions, stored lowercased with a leading dot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    /// Accepts `jpg`, `.jpg` and `.JPG` alike. Blank values are dropped.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            values
                .into_iter()
                .filter_map(|v| normalize_extension(v.as_ref()))
                .collect(),
        )
    }

    pub fn default_images() -> Self {
        Self::new(DEFAULT_IMAGE_EXTENSIONS)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `extension` must already be normalized, see [`extension_of`].
    pub fn contains(&self, extension: &str) -> bool {
        self.0.contains(extension)
    }

    /// An empty set filters nothing.
    pub fn allows(&self, path: &Path) -> bool {
        self.is_empty() || self.contains(&extension_of(path))
    }
}

pub fn normalize_extension(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{lower}"))
    }
}

/// Lowercased extension with its dot, or an empty string when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
