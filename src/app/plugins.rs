use crate::app::error::ConfigError;
use crate::app::models::{ConfigurationRecord, PluginManifest};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Capability every plugin provides to the generation engine.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Class names this plugin registers.
    fn contribute_classes(&self) -> Vec<String>;
}

/// A plugin compiled into the binary.
pub struct StaticPlugin {
    name: &'static str,
    classes: &'static [&'static str],
}

impl StaticPlugin {
    pub const fn new(name: &'static str, classes: &'static [&'static str]) -> Self {
        Self { name, classes }
    }
}

impl Plugin for StaticPlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn contribute_classes(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.to_string()).collect()
    }
}

/// A plugin described by a TOML manifest on disk.
pub struct ManifestPlugin {
    manifest: PluginManifest,
}

impl ManifestPlugin {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let manifest: PluginManifest = toml::from_str(&text).map_err(|e| e.message().to_string())?;
        if manifest.name.trim().is_empty() {
            return Err("manifest `name` must not be empty".to_string());
        }
        Ok(Self { manifest })
    }
}

impl Plugin for ManifestPlugin {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn contribute_classes(&self) -> Vec<String> {
        self.manifest.classes.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOrigin {
    Builtin,
    Local(PathBuf),
}

/// A resolved plugin reference.
#[derive(Clone)]
pub struct PluginHandle {
    pub reference: String,
    pub origin: PluginOrigin,
    pub plugin: Arc<dyn Plugin>,
}

impl fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHandle")
            .field("reference", &self.reference)
            .field("origin", &self.origin)
            .field("name", &self.plugin.name())
            .finish()
    }
}

const FORMS_CLASSES: &[&str] = &[
    "form-input",
    "form-textarea",
    "form-select",
    "form-multiselect",
    "form-checkbox",
    "form-radio",
];

const TYPOGRAPHY_CLASSES: &[&str] = &[
    "prose",
    "prose-sm",
    "prose-base",
    "prose-lg",
    "prose-xl",
    "prose-2xl",
    "prose-invert",
    "not-prose",
];

/// File name a directory plugin reference resolves to.
pub const MANIFEST_FILE_NAME: &str = "plugin.toml";

/// Maps plugin identifiers to handlers; resolves references at load time.
pub struct PluginRegistry {
    builtins: HashMap<String, Arc<dyn Plugin>>,
    user_dir: Option<PathBuf>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(
            "@tailwindcss/forms",
            Arc::new(StaticPlugin::new("forms", FORMS_CLASSES)),
        );
        registry.register(
            "@tailwindcss/typography",
            Arc::new(StaticPlugin::new("typography", TYPOGRAPHY_CLASSES)),
        );
        registry.user_dir = dirs::config_dir().map(|d| d.join("stylekit").join("plugins"));
        registry
    }
}

impl PluginRegistry {
    /// A registry with no built-ins and no user plugin directory.
    pub fn empty() -> Self {
        Self {
            builtins: HashMap::new(),
            user_dir: None,
        }
    }

    pub fn register(&mut self, id: impl Into<String>, plugin: Arc<dyn Plugin>) {
        self.builtins.insert(id.into(), plugin);
    }

    pub fn with_user_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.user_dir = dir;
        self
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.builtins.contains_key(id)
    }

    /// Resolves one reference: registry, then a path relative to `base_dir`,
    /// then `<user dir>/<name>.toml`.
    pub fn resolve(&self, reference: &str, base_dir: &Path) -> Result<PluginHandle, ConfigError> {
        if let Some(plugin) = self.builtins.get(reference) {
            log::debug!("Plugin `{}` resolved from registry", reference);
            return Ok(PluginHandle {
                reference: reference.to_string(),
                origin: PluginOrigin::Builtin,
                plugin: Arc::clone(plugin),
            });
        }

        let candidates = self.candidates(reference, base_dir);
        for candidate in &candidates {
            let manifest_path = if candidate.is_dir() {
                candidate.join(MANIFEST_FILE_NAME)
            } else {
                candidate.clone()
            };
            if !manifest_path.is_file() {
                continue;
            }
            let plugin = ManifestPlugin::from_file(&manifest_path).map_err(|reason| {
                log::warn!("Bad plugin manifest {}: {}", manifest_path.display(), reason);
                ConfigError::plugin_resolution(reference, vec![manifest_path.clone()])
            })?;
            log::debug!(
                "Plugin `{}` resolved to {}",
                reference,
                manifest_path.display()
            );
            return Ok(PluginHandle {
                reference: reference.to_string(),
                origin: PluginOrigin::Local(manifest_path),
                plugin: Arc::new(plugin),
            });
        }

        Err(ConfigError::plugin_resolution(reference, candidates))
    }

    pub fn resolve_all(
        &self,
        record: &ConfigurationRecord,
        base_dir: &Path,
    ) -> Result<Vec<PluginHandle>, ConfigError> {
        record
            .plugins
            .iter()
            .map(|reference| self.resolve(reference, base_dir))
            .collect()
    }

    fn candidates(&self, reference: &str, base_dir: &Path) -> Vec<PathBuf> {
        if is_path_reference(reference) {
            return vec![base_dir.join(reference)];
        }
        match &self.user_dir {
            // Scoped names like `@acme/grid` map to `@acme/grid.toml`.
            Some(dir) => vec![dir.join(format!("{}.toml", reference))],
            None => Vec::new(),
        }
    }
}

fn is_path_reference(reference: &str) -> bool {
    reference.starts_with("./")
        || reference.starts_with("../")
        || Path::new(reference).is_absolute()
}

/// Resolves every plugin of `record` with the default registry.
pub fn resolve_plugins(
    record: &ConfigurationRecord,
    base_dir: &Path,
) -> Result<Vec<PluginHandle>, ConfigError> {
    PluginRegistry::default().resolve_all(record, base_dir)
}

/// Class name to contributing plugin name. Later plugins override earlier ones.
pub fn contributed_classes(handles: &[PluginHandle]) -> BTreeMap<String, String> {
    let mut classes = BTreeMap::new();
    for handle in handles {
        for class in handle.plugin.contribute_classes() {
            classes.insert(class, handle.plugin.name().to_string());
        }
    }
    classes
}
