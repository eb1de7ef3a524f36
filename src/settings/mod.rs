//! Hierarchical application settings.
//!
//! - `store`: file-backed key/value store with scoped groups
//! - `tree`: arena of setting nodes, also used by settings editors
//! - `value`: scalar leaf values

mod store;
pub mod tree;
mod value;

pub use store::{default_settings_path, GroupGuard, SettingsStore};
pub use tree::{NodeId, SettingsTree};
pub use value::{FromSettingValue, SettingValue};
