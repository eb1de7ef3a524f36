//! Pinterest account settings.

use super::ServiceSubtree;

/// Typed view over `services.pinterest`.
pub struct PinterestSettings<'a> {
    data: ServiceSubtree<'a>,
}

impl<'a> PinterestSettings<'a> {
    pub const SERVICE_NAME: &'static str = "pinterest";

    pub fn new(data: ServiceSubtree<'a>) -> Self {
        Self { data }
    }

    /// User to authenticate with.
    pub fn user(&self) -> Option<String> {
        self.data.get("username")
    }

    pub fn set_user(&mut self, value: &str) {
        self.data.set("username", value);
    }
}
