//! Display identification and window layout persistence.

pub mod layout;
pub mod screen;

pub use layout::{RestoreSource, RestoredLayout, WindowLayout};
pub use screen::{identify, screen_for_window, Rect, ScreenId, ScreenInfo, ScreenSource};
