//! File-backed hierarchical settings store.

use super::tree::{NodeId, SettingsTree};
use super::value::{FromSettingValue, SettingValue};
use crate::config::{APP_NAME, APP_VERSION, SETTINGS_FILE_VERSION, SETTINGS_FILENAME};
use crate::error::Result;
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

const FILE_VERSION_KEY: &str = "file_version";

/// Returns the per-user settings file location.
///
/// `<config dir>/Friendly Pics 2/<version>/appsettings.json`
pub fn default_settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_NAME);
    path.push(APP_VERSION);
    path.push(SETTINGS_FILENAME);
    path
}

/// Key/value settings with nested groups, persisted as a JSON document.
///
/// Keys are dotted paths resolved relative to the active group stack.
/// Changes stay in memory until [`save`](Self::save) rewrites the whole file.
pub struct SettingsStore {
    path: PathBuf,
    tree: SettingsTree,
    groups: Vec<String>,
}

impl SettingsStore {
    /// Loads the settings file at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        info!("Settings file: {}", path.display());

        let tree = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                SettingsTree::new()
            } else {
                let doc: serde_json::Value = serde_json::from_str(&text)?;
                SettingsTree::from_json(&doc)
            }
        } else {
            debug!("Settings file not found, starting empty");
            SettingsTree::new()
        };

        let mut store = Self {
            path,
            tree,
            groups: Vec::new(),
        };
        store.stamp_file_version();
        Ok(store)
    }

    /// Loads the settings file from the default per-user location.
    pub fn open_default() -> Result<Self> {
        Self::open(default_settings_path())
    }

    /// Location of the settings file managed by this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schema version of the settings document.
    pub fn file_version(&self) -> String {
        self.tree
            .child(self.tree.root(), FILE_VERSION_KEY)
            .and_then(|id| self.tree.value(id))
            .and_then(String::from_setting)
            .unwrap_or_else(|| SETTINGS_FILE_VERSION.to_string())
    }

    /// Reads `key`, falling back to `default` when it is missing or has
    /// another type.
    pub fn get<T: FromSettingValue>(&self, key: &str, default: T) -> T {
        self.value(key)
            .and_then(T::from_setting)
            .unwrap_or(default)
    }

    /// Raw scalar stored at `key`.
    pub fn value(&self, key: &str) -> Option<&SettingValue> {
        self.lookup(key).and_then(|id| self.tree.value(id))
    }

    /// Whether `key` names a value or a group.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Stores `value` at `key`, creating intermediate groups as needed.
    ///
    /// NaN and infinite floats cannot be written to the settings file; they
    /// are dropped with a warning and any previous value at `key` is kept.
    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) {
        let value = value.into();
        if !value.is_storable() {
            warn!("Ignoring non-finite value for setting {}", key);
            return;
        }
        let (prefix, leaf) = split_leaf(key);
        let mut node = self.ensure_active_node();
        for segment in prefix {
            node = self.tree.ensure_group(node, segment);
        }
        self.tree.set_value(node, leaf, value);
    }

    /// Removes the value or group at `key`. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let (prefix, leaf) = split_leaf(key);
        let Some(mut node) = self.active_node() else {
            return false;
        };
        for segment in prefix {
            match self.tree.child(node, segment) {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.tree.remove_child(node, leaf)
    }

    /// Names of the groups directly under the active group.
    pub fn child_groups(&self) -> Vec<String> {
        self.active_children(true)
    }

    /// Names of the scalar values directly under the active group.
    pub fn child_keys(&self) -> Vec<String> {
        self.active_children(false)
    }

    /// Makes `name` the active group. Must be paired with [`end_group`](Self::end_group);
    /// prefer [`group`](Self::group) which pairs them automatically.
    pub fn begin_group(&mut self, name: &str) {
        self.groups.push(name.to_string());
    }

    /// Leaves the innermost active group.
    ///
    /// # Panics
    ///
    /// Panics if no group is active.
    pub fn end_group(&mut self) {
        if self.groups.pop().is_none() {
            panic!("end_group called without a matching begin_group");
        }
    }

    /// Enters `name` for the lifetime of the returned guard.
    pub fn group(&mut self, name: &str) -> GroupGuard<'_> {
        self.begin_group(name);
        let depth = self.groups.len();
        GroupGuard { store: self, depth }
    }

    /// Active group names, outermost first.
    pub fn active_groups(&self) -> &[String] {
        &self.groups
    }

    pub fn tree(&self) -> &SettingsTree {
        &self.tree
    }

    /// Mutable access for settings editors. Structural edits made here are
    /// persisted on the next save like any other change.
    pub fn tree_mut(&mut self) -> &mut SettingsTree {
        &mut self.tree
    }

    /// Drops every setting except the schema version. Not persisted until saved.
    pub fn clear(&mut self) {
        info!("Clearing all settings");
        self.tree.clear();
        self.stamp_file_version();
    }

    /// Rewrites the settings file with the full in-memory state.
    ///
    /// The document is written to a sibling temporary file and renamed over
    /// the target, so a failed write leaves both the old file and the
    /// in-memory state intact.
    pub fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.tree.to_json())?;

        if let Some(parent) = self.path.parent() {
            create_config_dir(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp_path, text).and_then(|_| fs::rename(&tmp_path, &self.path))
        {
            warn!("Failed to save settings to {}: {}", self.path.display(), e);
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!("Settings saved to {}", self.path.display());
        Ok(())
    }

    /// Alias of [`save`](Self::save).
    pub fn sync(&self) -> Result<()> {
        self.save()
    }

    fn stamp_file_version(&mut self) {
        let root = self.tree.root();
        self.tree
            .set_value(root, FILE_VERSION_KEY, SETTINGS_FILE_VERSION.into());
    }

    fn active_node(&self) -> Option<NodeId> {
        let mut node = self.tree.root();
        for name in &self.groups {
            node = self.tree.child(node, name)?;
            if !self.tree.is_group(node) {
                return None;
            }
        }
        Some(node)
    }

    fn ensure_active_node(&mut self) -> NodeId {
        let mut node = self.tree.root();
        for name in &self.groups {
            node = self.tree.ensure_group(node, name);
        }
        node
    }

    fn lookup(&self, key: &str) -> Option<NodeId> {
        let mut node = self.active_node()?;
        for segment in key.split('.') {
            node = self.tree.child(node, segment)?;
        }
        Some(node)
    }

    fn active_children(&self, groups: bool) -> Vec<String> {
        let Some(node) = self.active_node() else {
            return Vec::new();
        };
        self.tree
            .children(node)
            .iter()
            .filter(|&&c| self.tree.is_group(c) == groups)
            .map(|&c| self.tree.name(c).to_string())
            .collect()
    }
}

impl fmt::Display for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string_pretty(&self.tree.to_json()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Keeps a settings group active until dropped.
///
/// Derefs to the store, so nested groups are opened through the guard.
pub struct GroupGuard<'a> {
    store: &'a mut SettingsStore,
    depth: usize,
}

impl Deref for GroupGuard<'_> {
    type Target = SettingsStore;

    fn deref(&self) -> &SettingsStore {
        self.store
    }
}

impl DerefMut for GroupGuard<'_> {
    fn deref_mut(&mut self) -> &mut SettingsStore {
        self.store
    }
}

impl Drop for GroupGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.store.groups.truncate(self.depth.saturating_sub(1));
            return;
        }
        assert_eq!(
            self.store.groups.len(),
            self.depth,
            "settings group stack mismatch: groups {:?}",
            self.store.groups
        );
        self.store.groups.pop();
    }
}

fn split_leaf(key: &str) -> (Vec<&str>, &str) {
    match key.rsplit_once('.') {
        Some((prefix, leaf)) => (prefix.split('.').collect(), leaf),
        None => (Vec::new(), key),
    }
}

#[cfg(unix)]
fn create_config_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_config_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
