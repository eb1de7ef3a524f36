//! State management for the image browser.

use crate::display::{Rect, RestoredLayout, ScreenSource, WindowLayout};
use crate::error::Result;
use crate::settings::SettingsStore;
use log::info;
use std::path::Path;

pub mod image_list;

pub use image_list::{ImageEntry, ImageListModel};

/// Settings key of the main window's layout record.
pub const MAIN_WINDOW: &str = "main_window";

/// Application-wide state container.
///
/// Owns the one settings store of the session; UI code borrows it from here
/// rather than reaching for a global.
pub struct AppState {
    settings: SettingsStore,
    image_list: Option<ImageListModel>,
    main_window: WindowLayout,
    debug_panel_visible: bool,
}

impl AppState {
    pub fn new(settings: SettingsStore) -> Self {
        Self {
            settings,
            image_list: None,
            main_window: WindowLayout::new(MAIN_WINDOW),
            debug_panel_visible: false,
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    /// List for the currently opened folder, if any.
    pub fn image_list(&self) -> Option<&ImageListModel> {
        self.image_list.as_ref()
    }

    pub fn image_list_mut(&mut self) -> Option<&mut ImageListModel> {
        self.image_list.as_mut()
    }

    /// Replaces the current list with one for `dir`.
    ///
    /// On failure the previous list stays installed.
    pub fn open_folder(&mut self, dir: &Path) -> Result<&ImageListModel> {
        let model = ImageListModel::open(dir)?;
        info!(
            "Opened {} ({} files, {} loaded)",
            dir.display(),
            model.total_count(),
            model.loaded_count()
        );
        Ok(&*self.image_list.insert(model))
    }

    /// Geometry to open the main window with. Also restores the debug panel flag.
    pub fn restore_main_window(&mut self, source: &dyn ScreenSource) -> Result<RestoredLayout> {
        let screens = source.screens();
        let restored = self.main_window.restore(&mut self.settings, &screens)?;
        self.debug_panel_visible = restored.debug_panel_visible;
        Ok(restored)
    }

    pub fn debug_panel_visible(&self) -> bool {
        self.debug_panel_visible
    }

    /// Flips the debug panel flag and returns the new value.
    pub fn toggle_debug_panel(&mut self) -> bool {
        self.debug_panel_visible = !self.debug_panel_visible;
        self.debug_panel_visible
    }

    /// Erases all saved settings on disk and keeps the shutdown capture from
    /// writing them back.
    pub fn reset_settings(&mut self) -> Result<()> {
        self.settings.clear();
        self.settings.save()?;
        self.main_window.suppress_save();
        Ok(())
    }

    /// Records the main window layout (unless suppressed) and saves settings.
    pub fn shutdown(&mut self, geometry: Rect, source: &dyn ScreenSource) -> Result<()> {
        info!("Shutting down");
        let screens = source.screens();
        self.main_window
            .capture(&mut self.settings, geometry, self.debug_panel_visible, &screens)?;
        self.settings.save()
    }
}
