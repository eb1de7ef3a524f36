//! Stable identifiers for physical displays.

use std::fmt;

/// Axis-aligned rectangle in virtual desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (i64, i64) {
        (
            self.x as i64 + self.width as i64 / 2,
            self.y as i64 + self.height as i64 / 2,
        )
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        let left = self.x as i64;
        let top = self.y as i64;
        x >= left && y >= top && x < left + self.width as i64 && y < top + self.height as i64
    }

    /// Area shared by both rectangles.
    pub fn overlap_area(&self, other: &Rect) -> u64 {
        let left = (self.x as i64).max(other.x as i64);
        let top = (self.y as i64).max(other.y as i64);
        let right = (self.x as i64 + self.width as i64).min(other.x as i64 + other.width as i64);
        let bottom =
            (self.y as i64 + self.height as i64).min(other.y as i64 + other.height as i64);
        if right <= left || bottom <= top {
            0
        } else {
            ((right - left) * (bottom - top)) as u64
        }
    }
}

/// A display as reported by the windowing system.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenInfo {
    /// Hardware serial number, when the display exposes one.
    pub serial: Option<String>,
    pub name: String,
    pub geometry: Rect,
    pub physical_dpi: f64,
}

/// Enumerates the currently attached displays.
pub trait ScreenSource {
    fn screens(&self) -> Vec<ScreenInfo>;
}

/// Identifier of a physical display that survives restarts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(String);

impl ScreenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the [`ScreenId`] of `screen`.
///
/// The hardware serial wins when present. Otherwise the id is built from the
/// display name and physical DPI, which only stays stable while the OS keeps
/// assigning the same name to the same display.
pub fn identify(screen: &ScreenInfo) -> ScreenId {
    match screen.serial.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(serial) => ScreenId::new(serial),
        None => ScreenId::new(format!(
            "screen-{}-{}dpi",
            screen.name,
            screen.physical_dpi.round() as i64
        )),
    }
}

/// Picks the display a window is on: the one containing its centre, else the
/// one it overlaps most, else the first display.
pub fn screen_for_window<'a>(window: &Rect, screens: &'a [ScreenInfo]) -> Option<&'a ScreenInfo> {
    let (cx, cy) = window.center();
    screens
        .iter()
        .find(|s| s.geometry.contains(cx, cy))
        .or_else(|| {
            screens
                .iter()
                .filter(|s| s.geometry.overlap_area(window) > 0)
                .max_by_key(|s| s.geometry.overlap_area(window))
        })
        .or_else(|| screens.first())
}

#[cfg(test)]
pub(crate) fn test_screen(serial: Option<&str>, name: &str, geometry: Rect) -> ScreenInfo {
    ScreenInfo {
        serial: serial.map(str::to_string),
        name: name.to_string(),
        geometry,
        physical_dpi: 96.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_number_is_the_id() {
        let a = test_screen(Some("SN123"), "DP-1", Rect::new(0, 0, 1920, 1080));
        let b = test_screen(Some("SN123"), "HDMI-2", Rect::new(1920, 0, 2560, 1440));
        assert_eq!(identify(&a).as_str(), "SN123");
        assert_eq!(identify(&a), identify(&b));
    }

    #[test]
    fn fallback_uses_name_and_rounded_dpi() {
        let mut screen = test_screen(None, "DELL U2720Q", Rect::new(0, 0, 3840, 2160));
        screen.physical_dpi = 163.4;
        assert_eq!(identify(&screen).as_str(), "screen-DELL U2720Q-163dpi");

        screen.serial = Some("  ".into());
        assert_eq!(identify(&screen).as_str(), "screen-DELL U2720Q-163dpi");
    }

    #[test]
    fn screens_without_serial_differ_by_name() {
        let a = test_screen(None, "DP-1", Rect::new(0, 0, 1920, 1080));
        let b = test_screen(None, "DP-2", Rect::new(0, 0, 1920, 1080));
        assert_ne!(identify(&a), identify(&b));
    }

    #[test]
    fn same_named_screens_differ_by_dpi() {
        let mut a = test_screen(None, "DP-1", Rect::new(0, 0, 1920, 1080));
        let mut b = test_screen(None, "DP-1", Rect::new(0, 0, 1920, 1080));
        a.physical_dpi = 96.0;
        b.physical_dpi = 144.0;
        assert_eq!(identify(&a).as_str(), "screen-DP-1-96dpi");
        assert_eq!(identify(&b).as_str(), "screen-DP-1-144dpi");
        assert_ne!(identify(&a), identify(&b));
    }

    #[test]
    fn window_screen_prefers_centre_then_overlap() {
        let screens = vec![
            test_screen(Some("left"), "L", Rect::new(0, 0, 1000, 1000)),
            test_screen(Some("right"), "R", Rect::new(1000, 0, 1000, 1000)),
        ];

        let centred_right = Rect::new(900, 100, 400, 400);
        assert_eq!(
            screen_for_window(&centred_right, &screens).map(identify),
            Some(ScreenId::new("right"))
        );

        // Centre falls below both screens; the left one overlaps more.
        let below = Rect::new(100, 900, 1000, 400);
        assert_eq!(
            screen_for_window(&below, &screens).map(identify),
            Some(ScreenId::new("left"))
        );

        let offscreen = Rect::new(-5000, -5000, 10, 10);
        assert_eq!(
            screen_for_window(&offscreen, &screens).map(identify),
            Some(ScreenId::new("left"))
        );
        assert!(screen_for_window(&offscreen, &[]).is_none());
    }
}
