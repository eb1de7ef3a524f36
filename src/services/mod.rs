//! Settings adapters for external services.
//!
//! Every supported service owns the subtree `services.<name>` of the
//! settings store. Adapters are typed views over that subtree and hold no
//! data of their own.

pub mod pinterest;

pub use pinterest::PinterestSettings;

use crate::config::SERVICES_GROUP;
use crate::error::{AppError, Result};
use crate::settings::{FromSettingValue, NodeId, SettingValue, SettingsStore, SettingsTree};
use log::warn;

/// Services with a settings adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Pinterest,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 1] = [ServiceKind::Pinterest];

    /// Name of the settings subtree for this service.
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Pinterest => PinterestSettings::SERVICE_NAME,
        }
    }

    /// Looks up a service by its subtree name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| {
                warn!("Requested settings for unsupported service: {}", name);
                AppError::UnsupportedService(name.to_string())
            })
    }
}

/// Names of every service with a settings adapter.
pub fn supported_service_names() -> Vec<&'static str> {
    ServiceKind::ALL.into_iter().map(ServiceKind::name).collect()
}

/// Typed settings view for one service.
pub enum ServiceSettings<'a> {
    Pinterest(PinterestSettings<'a>),
}

impl ServiceSettings<'_> {
    pub fn kind(&self) -> ServiceKind {
        match self {
            ServiceSettings::Pinterest(_) => ServiceKind::Pinterest,
        }
    }
}

/// Returns the settings adapter for `name`, creating an empty subtree for a
/// supported service seen for the first time.
///
/// Unsupported names fail with [`AppError::UnsupportedService`] and leave the
/// store untouched.
pub fn get_service<'a>(store: &'a mut SettingsStore, name: &str) -> Result<ServiceSettings<'a>> {
    let kind = ServiceKind::from_name(name)?;
    let subtree = ServiceSubtree::open(store.tree_mut(), kind);
    Ok(match kind {
        ServiceKind::Pinterest => ServiceSettings::Pinterest(PinterestSettings::new(subtree)),
    })
}

/// Raw access to one service's settings subtree.
pub struct ServiceSubtree<'a> {
    tree: &'a mut SettingsTree,
    node: NodeId,
}

impl<'a> ServiceSubtree<'a> {
    fn open(tree: &'a mut SettingsTree, kind: ServiceKind) -> Self {
        let root = tree.root();
        let services = tree.ensure_group(root, SERVICES_GROUP);
        let node = tree.ensure_group(services, kind.name());
        Self { tree, node }
    }

    pub fn get<T: FromSettingValue>(&self, key: &str) -> Option<T> {
        self.tree
            .child(self.node, key)
            .and_then(|id| self.tree.value(id))
            .and_then(T::from_setting)
    }

    /// Stores `value` at `key`. Non-finite floats are dropped with a warning.
    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) {
        let value = value.into();
        if !value.is_storable() {
            warn!("Ignoring non-finite value for service setting {}", key);
            return;
        }
        self.tree.set_value(self.node, key, value);
    }
}
