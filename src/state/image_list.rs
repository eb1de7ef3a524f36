//! Incrementally exposed list of the images in one folder.

use crate::config::{INITIAL_PAGE_SIZE, PAGE_INCREMENT};
use crate::error::Result;
use crate::file_utils::{self, PathExt};
use crate::image_loader::{ImageThumbnailRenderer, Thumbnail, ThumbnailRenderer};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One file in the list with its lazily rendered thumbnail.
pub struct ImageEntry {
    name: String,
    path: PathBuf,
    /// `Some(None)` once rendering was attempted and failed.
    thumbnail: OnceCell<Option<Thumbnail>>,
}

impl ImageEntry {
    fn new(path: PathBuf) -> Self {
        Self {
            name: path.file_name_lossy(),
            path,
            thumbnail: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached thumbnail, rendering it with `renderer` on first use.
    ///
    /// A render failure is cached as `None`; the entry stays in the list and
    /// the view shows a placeholder.
    pub fn thumbnail_with(&self, renderer: &dyn ThumbnailRenderer) -> Option<&Thumbnail> {
        self.thumbnail
            .get_or_init(|| match renderer.render(&self.path) {
                Ok(thumbnail) => Some(thumbnail),
                Err(e) => {
                    warn!("No thumbnail for {}: {}", self.path.display(), e);
                    None
                }
            })
            .as_ref()
    }

    /// Whether rendering has already been attempted.
    pub fn is_thumbnail_resolved(&self) -> bool {
        self.thumbnail.get().is_some()
    }
}

/// Folder snapshot exposed in pages.
///
/// The file list is fixed at construction. The loaded window starts at
/// [`INITIAL_PAGE_SIZE`] rows and grows by [`PAGE_INCREMENT`] on each
/// [`load_more`](Self::load_more); it never shrinks.
pub struct ImageListModel {
    directory: PathBuf,
    entries: Vec<ImageEntry>,
    loaded: usize,
    renderer: Box<dyn ThumbnailRenderer>,
}

impl ImageListModel {
    /// Scans `dir` and renders thumbnails with the `image` crate.
    pub fn open(dir: &Path) -> Result<Self> {
        Self::with_renderer(dir, Box::new(ImageThumbnailRenderer::default()))
    }

    /// Scans `dir` and renders thumbnails with `renderer`.
    pub fn with_renderer(dir: &Path, renderer: Box<dyn ThumbnailRenderer>) -> Result<Self> {
        let start = std::time::Instant::now();
        debug!("Scanning directory: {}", dir.display());

        let entries: Vec<ImageEntry> = file_utils::scan_directory(dir)?
            .into_iter()
            .map(ImageEntry::new)
            .collect();
        let loaded = INITIAL_PAGE_SIZE.min(entries.len());

        debug!(
            "Scanned {} files in {} in {:?}",
            entries.len(),
            dir.display(),
            start.elapsed()
        );

        Ok(Self {
            directory: dir.to_path_buf(),
            entries,
            loaded,
            renderer,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn has_more(&self) -> bool {
        self.loaded < self.entries.len()
    }

    /// Extends the loaded window by up to [`PAGE_INCREMENT`] rows and returns
    /// how many were added. Does nothing once everything is loaded.
    pub fn load_more(&mut self) -> usize {
        let added = PAGE_INCREMENT.min(self.entries.len() - self.loaded);
        self.loaded += added;
        if added > 0 {
            debug!("Loaded {} more entries ({}/{})", added, self.loaded, self.entries.len());
        }
        added
    }

    /// Entry at `index`, or `None` outside the loaded window.
    pub fn entry_at(&self, index: usize) -> Option<&ImageEntry> {
        self.loaded_entries().get(index)
    }

    /// Thumbnail of the entry at `index`, rendered on first request.
    pub fn thumbnail_at(&self, index: usize) -> Option<&Thumbnail> {
        self.entry_at(index)?.thumbnail_with(self.renderer.as_ref())
    }

    pub fn loaded_entries(&self) -> &[ImageEntry] {
        &self.entries[..self.loaded]
    }

    /// Renders every loaded thumbnail not rendered yet, in parallel, and
    /// returns how many loaded entries have a thumbnail.
    pub fn prefetch_thumbnails(&self) -> usize {
        let renderer = self.renderer.as_ref();
        self.loaded_entries()
            .par_iter()
            .filter(|entry| entry.thumbnail_with(renderer).is_some())
            .count()
    }
}
