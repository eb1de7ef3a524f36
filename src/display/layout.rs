//! Per-screen window geometry persistence.
//!
//! Settings layout for a window named `main`:
//!
//! ```text
//! windows
//!   main
//!     last_screen = "<ScreenId>"
//!     debug_panel_visible = false
//!     screens
//!       <ScreenId>  { x, y, width, height }
//! ```
//!
//! Geometry of displays that are no longer attached is kept, so it is
//! reused when the display comes back.

use super::screen::{identify, screen_for_window, Rect, ScreenId, ScreenInfo};
use crate::config::WINDOWS_GROUP;
use crate::error::{AppError, Result};
use crate::settings::{FromSettingValue, SettingsStore};
use log::{debug, info};

const LAST_SCREEN_KEY: &str = "last_screen";
const DEBUG_PANEL_KEY: &str = "debug_panel_visible";
const SCREENS_GROUP: &str = "screens";

/// Which restore rule produced the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreSource {
    /// The last-used display is attached and had cached geometry.
    LastScreen,
    /// The last-used display is attached but had nothing cached.
    LastScreenDefault,
    /// Another attached display had cached geometry.
    CachedScreen,
    /// Nothing usable was cached; geometry is computed for the first display.
    Default,
}

/// Result of [`WindowLayout::restore`].
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredLayout {
    pub screen: ScreenId,
    pub geometry: Rect,
    pub debug_panel_visible: bool,
    pub source: RestoreSource,
}

/// Saves and restores one window's geometry per display.
pub struct WindowLayout {
    window_name: String,
    save_suppressed: bool,
}

impl WindowLayout {
    pub fn new(window_name: impl Into<String>) -> Self {
        Self {
            window_name: window_name.into(),
            save_suppressed: false,
        }
    }

    pub fn window_name(&self) -> &str {
        &self.window_name
    }

    /// Turns [`capture`](Self::capture) into a no-op, e.g. after the user
    /// reset all settings.
    pub fn suppress_save(&mut self) {
        self.save_suppressed = true;
    }

    pub fn is_save_suppressed(&self) -> bool {
        self.save_suppressed
    }

    /// Computes the geometry to open the window with.
    ///
    /// Priority: the last-used display if attached, then the first attached
    /// display (in `screens` order) with cached geometry, then a half-size
    /// centred window on the first attached display.
    pub fn restore(
        &self,
        store: &mut SettingsStore,
        screens: &[ScreenInfo],
    ) -> Result<RestoredLayout> {
        if screens.is_empty() {
            return Err(AppError::NoScreens);
        }
        let available: Vec<(ScreenId, &ScreenInfo)> =
            screens.iter().map(|s| (identify(s), s)).collect();

        let mut windows = store.group(WINDOWS_GROUP);
        let mut window = windows.group(&self.window_name);
        let debug_panel_visible = window.get(DEBUG_PANEL_KEY, false);
        let last_screen = window.value(LAST_SCREEN_KEY).and_then(String::from_setting);
        let mut cached = window.group(SCREENS_GROUP);

        let layout = |screen: &ScreenId, geometry: Rect, source: RestoreSource| {
            info!(
                "Restoring window '{}' on {} at {:?} ({:?})",
                self.window_name, screen, geometry, source
            );
            RestoredLayout {
                screen: screen.clone(),
                geometry,
                debug_panel_visible,
                source,
            }
        };

        if let Some(last) = last_screen {
            if let Some((id, info)) = available.iter().find(|(id, _)| id.as_str() == last) {
                return Ok(match read_geometry(&mut cached, id) {
                    Some(geometry) => layout(id, geometry, RestoreSource::LastScreen),
                    None => layout(id, default_geometry(info), RestoreSource::LastScreenDefault),
                });
            }
            debug!("Last used screen {} is not attached", last);
        }

        let cached_ids = cached.child_groups();
        let fallback = available
            .iter()
            .filter(|(id, _)| cached_ids.iter().any(|c| c == id.as_str()))
            .find_map(|(id, _)| read_geometry(&mut cached, id).map(|g| (id, g)));
        if let Some((id, geometry)) = fallback {
            return Ok(layout(id, geometry, RestoreSource::CachedScreen));
        }

        let (id, info) = &available[0];
        Ok(layout(id, default_geometry(info), RestoreSource::Default))
    }

    /// Records the window's current geometry for the display it is on and
    /// marks that display as last used.
    ///
    /// Writes to the in-memory store only; callers save afterwards. Returns
    /// `None` when saving is suppressed.
    pub fn capture(
        &self,
        store: &mut SettingsStore,
        geometry: Rect,
        debug_panel_visible: bool,
        screens: &[ScreenInfo],
    ) -> Result<Option<ScreenId>> {
        if self.save_suppressed {
            info!("Skipping layout save for window '{}'", self.window_name);
            return Ok(None);
        }
        let screen = screen_for_window(&geometry, screens).ok_or(AppError::NoScreens)?;
        let id = identify(screen);

        let mut windows = store.group(WINDOWS_GROUP);
        let mut window = windows.group(&self.window_name);
        window.set(LAST_SCREEN_KEY, id.as_str());
        window.set(DEBUG_PANEL_KEY, debug_panel_visible);

        let mut cached = window.group(SCREENS_GROUP);
        let mut slot = cached.group(id.as_str());
        slot.set("x", geometry.x);
        slot.set("y", geometry.y);
        slot.set("width", geometry.width);
        slot.set("height", geometry.height);

        debug!(
            "Captured window '{}' on {} at {:?}",
            self.window_name, id, geometry
        );
        Ok(Some(id))
    }
}

/// Half the display's size, centred on it.
pub fn default_geometry(screen: &ScreenInfo) -> Rect {
    let area = screen.geometry;
    let width = area.width / 2;
    let height = area.height / 2;
    Rect::new(
        area.x + ((area.width - width) / 2) as i32,
        area.y + ((area.height - height) / 2) as i32,
        width,
        height,
    )
}

fn read_geometry(store: &mut SettingsStore, id: &ScreenId) -> Option<Rect> {
    let slot = store.group(id.as_str());
    let read = |key: &str| slot.value(key);
    Some(Rect::new(
        i32::from_setting(read("x")?)?,
        i32::from_setting(read("y")?)?,
        u32::from_setting(read("width")?)?,
        u32::from_setting(read("height")?)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::screen::test_screen;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::open(dir.path().join("appsettings.json")).unwrap()
    }

    fn screen(serial: &str, x: i32) -> ScreenInfo {
        test_screen(Some(serial), serial, Rect::new(x, 0, 1920, 1080))
    }

    fn seed(store: &mut SettingsStore, id: &str, geometry: Rect, last: bool) {
        let mut windows = store.group(WINDOWS_GROUP);
        let mut window = windows.group("main");
        if last {
            window.set(LAST_SCREEN_KEY, id);
        }
        let mut cached = window.group(SCREENS_GROUP);
        let mut slot = cached.group(id);
        slot.set("x", geometry.x);
        slot.set("y", geometry.y);
        slot.set("width", geometry.width);
        slot.set("height", geometry.height);
    }

    #[test]
    fn empty_store_centres_on_first_screen() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let screens = vec![screen("S1", 0), screen("S2", 1920)];

        let restored = WindowLayout::new("main").restore(&mut store, &screens).unwrap();
        assert_eq!(restored.screen, ScreenId::new("S1"));
        assert_eq!(restored.geometry, Rect::new(480, 270, 960, 540));
        assert_eq!(restored.source, RestoreSource::Default);
        assert!(!restored.debug_panel_visible);
        assert!(store.active_groups().is_empty());
    }

    #[test]
    fn last_used_screen_wins_when_attached() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        seed(&mut store, "S2", Rect::new(2000, 10, 800, 600), false);
        seed(&mut store, "S1", Rect::new(10, 20, 300, 200), true);
        let screens = vec![screen("S2", 1920), screen("S1", 0)];

        let restored = WindowLayout::new("main").restore(&mut store, &screens).unwrap();
        assert_eq!(restored.screen, ScreenId::new("S1"));
        assert_eq!(restored.geometry, Rect::new(10, 20, 300, 200));
        assert_eq!(restored.source, RestoreSource::LastScreen);
    }

    #[test]
    fn last_used_screen_without_cache_gets_default_geometry() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("windows.main.last_screen", "S2");
        let screens = vec![screen("S1", 0), screen("S2", 1920)];

        let restored = WindowLayout::new("main").restore(&mut store, &screens).unwrap();
        assert_eq!(restored.screen, ScreenId::new("S2"));
        assert_eq!(restored.geometry, Rect::new(1920 + 480, 270, 960, 540));
        assert_eq!(restored.source, RestoreSource::LastScreenDefault);
    }

    #[test]
    fn falls_back_to_attached_screen_with_cached_geometry() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        seed(&mut store, "S1", Rect::new(10, 20, 300, 200), true);
        seed(&mut store, "S2", Rect::new(2000, 50, 640, 480), false);
        let screens = vec![screen("S3", 0), screen("S2", 1920)];

        let restored = WindowLayout::new("main").restore(&mut store, &screens).unwrap();
        assert_eq!(restored.screen, ScreenId::new("S2"));
        assert_eq!(restored.geometry, Rect::new(2000, 50, 640, 480));
        assert_eq!(restored.source, RestoreSource::CachedScreen);
    }

    #[test]
    fn cached_fallback_follows_screen_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        seed(&mut store, "A", Rect::new(1, 1, 100, 100), false);
        seed(&mut store, "B", Rect::new(2, 2, 200, 200), false);
        let screens = vec![screen("C", 0), screen("B", 1920), screen("A", 3840)];

        let restored = WindowLayout::new("main").restore(&mut store, &screens).unwrap();
        assert_eq!(restored.screen, ScreenId::new("B"));
    }

    #[test]
    fn no_screens_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let layout = WindowLayout::new("main");
        assert!(matches!(layout.restore(&mut store, &[]), Err(AppError::NoScreens)));
        assert!(matches!(
            layout.capture(&mut store, Rect::new(0, 0, 10, 10), false, &[]),
            Err(AppError::NoScreens)
        ));
    }

    #[test]
    fn capture_then_restore_across_sessions() {
        let dir = TempDir::new().unwrap();
        let screens = vec![screen("S1", 0), screen("S.2", 1920)];
        let layout = WindowLayout::new("main");

        let mut store = store_in(&dir);
        let id = layout
            .capture(&mut store, Rect::new(2100, 100, 900, 700), true, &screens)
            .unwrap();
        assert_eq!(id, Some(ScreenId::new("S.2")));
        store.save().unwrap();

        let mut store = store_in(&dir);
        let restored = layout.restore(&mut store, &screens).unwrap();
        assert_eq!(restored.screen, ScreenId::new("S.2"));
        assert_eq!(restored.geometry, Rect::new(2100, 100, 900, 700));
        assert!(restored.debug_panel_visible);
    }

    #[test]
    fn geometry_of_detached_screen_is_kept() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let layout = WindowLayout::new("main");

        layout
            .capture(&mut store, Rect::new(100, 100, 500, 400), false, &[screen("S1", 0)])
            .unwrap();
        layout
            .capture(&mut store, Rect::new(200, 200, 600, 500), false, &[screen("S2", 0)])
            .unwrap();

        assert_eq!(store.get("windows.main.last_screen", String::new()), "S2");
        store.begin_group("windows");
        store.begin_group("main");
        store.begin_group("screens");
        assert_eq!(store.child_groups(), vec!["S1", "S2"]);
        store.end_group();
        store.end_group();
        store.end_group();

        let restored = layout.restore(&mut store, &[screen("S1", 0)]).unwrap();
        assert_eq!(restored.geometry, Rect::new(100, 100, 500, 400));
    }

    #[test]
    fn suppressed_capture_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let mut layout = WindowLayout::new("main");
        layout.suppress_save();

        let id = layout
            .capture(&mut store, Rect::new(0, 0, 10, 10), true, &[screen("S1", 0)])
            .unwrap();
        assert_eq!(id, None);
        assert!(!store.contains("windows"));
    }
}
