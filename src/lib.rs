//! Typed loader, validator and query layer for utility-class generator
//! configuration documents.

pub mod app;

pub use app::config::{config_dir, find_config, load, CONFIG_FILE_NAME};
pub use app::error::ConfigError;
pub use app::models::{ConfigurationRecord, ContentFile, DarkMode, PluginManifest, Theme};
pub use app::plugins::{
    contributed_classes, resolve_plugins, Plugin, PluginHandle, PluginOrigin, PluginRegistry,
    StaticPlugin,
};
pub use app::safelist::{is_blocked, matches_safelist, retains, Safelist, SafelistEntry};
pub use app::scanner::{content_files, Scanner};
