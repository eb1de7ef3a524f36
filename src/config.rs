//! Application configuration constants.

/// Application name used for the per-user configuration directory.
pub const APP_NAME: &str = "Friendly Pics 2";

/// Vendor name associated with the application.
pub const APP_VENDOR: &str = "The Friendly Coder";

/// Application version, also part of the settings directory path.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the settings document inside the configuration directory.
pub const SETTINGS_FILENAME: &str = "appsettings.json";

/// Schema version stamped into every settings document.
pub const SETTINGS_FILE_VERSION: &str = "1.0";

/// Number of list rows exposed right after a folder is opened.
pub const INITIAL_PAGE_SIZE: usize = 50;

/// Number of list rows added by each `load_more` call.
pub const PAGE_INCREMENT: usize = 10;

/// Longest edge of a generated thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 128;

/// Settings group holding per-window layout records.
pub const WINDOWS_GROUP: &str = "windows";

/// Settings group holding per-service subtrees.
pub const SERVICES_GROUP: &str = "services";
