use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::assets::encoded::{EncodedImage, ImageEncoding};

/// Destination for finished photos.
///
/// Saving is fire-and-forget: sinks report failures through logging, never to the caller.
pub trait ExportSink {
    /// Store `image` under `suggested_name`.
    fn save(&mut self, image: &EncodedImage, suggested_name: &str);
}

/// Milliseconds since the Unix epoch, used in suggested file names.
pub fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Name for the `n`-th captured photo (1-based), e.g. `snapjoy-2-1700000000000.jpg`.
pub fn slot_file_name(n: usize, timestamp_ms: u64, encoding: ImageEncoding) -> String {
    format!("snapjoy-{n}-{timestamp_ms}.{}", encoding.extension())
}

/// Name for an edited photo, e.g. `snapjoy-edited-1700000000000.jpg`.
pub fn edited_file_name(timestamp_ms: u64, encoding: ImageEncoding) -> String {
    format!("snapjoy-edited-{timestamp_ms}.{}", encoding.extension())
}

/// Name for a rendered collage sheet.
pub fn collage_file_name(timestamp_ms: u64, encoding: ImageEncoding) -> String {
    format!("snapjoy-collage-{timestamp_ms}.{}", encoding.extension())
}

/// Save a flattened edit under the edited naming scheme.
pub fn save_edited(sink: &mut dyn ExportSink, image: &EncodedImage, timestamp_ms: u64) {
    sink.save(image, &edited_file_name(timestamp_ms, image.encoding()));
}

/// Writes photos into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`; the directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, image: &EncodedImage, name: &str) -> anyhow::Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            anyhow::bail!("invalid file name '{name}'");
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create export dir '{}'", self.dir.display()))?;
        let path = self.dir.join(name);
        std::fs::write(&path, image.bytes())
            .with_context(|| format!("write '{}'", path.display()))?;
        Ok(path)
    }
}

impl ExportSink for DirectorySink {
    fn save(&mut self, image: &EncodedImage, suggested_name: &str) {
        match self.write(image, suggested_name) {
            Ok(path) => tracing::debug!(path = %path.display(), "photo saved"),
            Err(e) => tracing::warn!(error = %format!("{e:#}"), "photo export failed"),
        }
    }
}

/// Keeps saved photos in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    /// Saved photos with their names, in save order.
    pub saved: Vec<(String, EncodedImage)>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExportSink for MemorySink {
    fn save(&mut self, image: &EncodedImage, suggested_name: &str) {
        self.saved.push((suggested_name.to_owned(), image.clone()));
    }
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
