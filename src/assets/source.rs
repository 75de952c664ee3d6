use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::store::normalize_rel_path,
    foundation::error::{SnapError, SnapResult},
};

/// Resolves encoded sticker files and font faces for the gather phase of a render.
///
/// Implementations may perform IO; the renderer calls them only before drawing starts.
pub trait AssetSource {
    /// Return the encoded bytes of an image or SVG sticker.
    fn load_bytes(&self, key: &str) -> SnapResult<Vec<u8>>;

    /// Return font bytes for a CSS-like family stack such as `"Georgia, serif"`.
    ///
    /// Families are tried left to right; the first one known to the source wins.
    fn load_font(&self, family_stack: &str) -> SnapResult<Vec<u8>>;
}

/// Split a CSS-like font family stack into trimmed, unquoted family names.
pub fn font_families(stack: &str) -> impl Iterator<Item = &str> {
    stack
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|f| !f.is_empty())
}

fn family_key(family: &str) -> String {
    family.to_ascii_lowercase()
}

/// In-memory asset source, mostly useful for previews and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
    fonts: HashMap<String, Vec<u8>>,
    fallback_font: Option<Vec<u8>>,
}

impl MemoryAssetSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded bytes under `key`.
    pub fn with_file(mut self, key: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.files.insert(key.into(), bytes);
        self
    }

    /// Register a font face under a family name (case-insensitive).
    pub fn with_font(mut self, family: &str, bytes: Vec<u8>) -> Self {
        self.fonts.insert(family_key(family), bytes);
        self
    }

    /// Font used when no family of a stack is registered.
    pub fn with_fallback_font(mut self, bytes: Vec<u8>) -> Self {
        self.fallback_font = Some(bytes);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn load_bytes(&self, key: &str) -> SnapResult<Vec<u8>> {
        self.files
            .get(key)
            .cloned()
            .ok_or_else(|| SnapError::asset(format!("no asset registered for '{key}'")))
    }

    fn load_font(&self, family_stack: &str) -> SnapResult<Vec<u8>> {
        font_families(family_stack)
            .find_map(|f| self.fonts.get(&family_key(f)))
            .or(self.fallback_font.as_ref())
            .cloned()
            .ok_or_else(|| SnapError::asset(format!("no font available for '{family_stack}'")))
    }
}

/// Asset source rooted at a directory on disk.
///
/// Sticker keys are relative paths below the root; fonts are mapped explicitly by family name.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
    fonts: HashMap<String, PathBuf>,
    fallback_font: Option<PathBuf>,
}

impl FsAssetSource {
    /// Create a source reading sticker files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fonts: HashMap::new(),
            fallback_font: None,
        }
    }

    /// Map a family name to a font file.
    pub fn with_font(mut self, family: &str, path: impl Into<PathBuf>) -> Self {
        self.fonts.insert(family_key(family), path.into());
        self
    }

    /// Font file used when no family of a stack is mapped.
    pub fn with_fallback_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_font = Some(path.into());
        self
    }

    /// Directory sticker keys are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn load_bytes(&self, key: &str) -> SnapResult<Vec<u8>> {
        let rel = normalize_rel_path(key)?;
        let path = self.root.join(rel);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read asset {}", path.display()))?;
        Ok(bytes)
    }

    fn load_font(&self, family_stack: &str) -> SnapResult<Vec<u8>> {
        let path = font_families(family_stack)
            .find_map(|f| self.fonts.get(&family_key(f)))
            .or(self.fallback_font.as_ref())
            .ok_or_else(|| SnapError::asset(format!("no font mapped for '{family_stack}'")))?;
        let bytes =
            std::fs::read(path).with_context(|| format!("read font {}", path.display()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
