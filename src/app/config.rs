use crate::app::error::ConfigError;
use crate::app::models::ConfigurationRecord;
use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked for when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "stylekit.toml";

const INLINE_ORIGIN: &str = "<inline>";

/// Reads and validates the document at `path`.
pub fn load(path: &Path) -> Result<ConfigurationRecord, ConfigError> {
    let origin = path.display().to_string();
    let text = fs::read_to_string(path)
        .map_err(|e| ConfigError::malformed(origin.clone(), format!("cannot read: {}", e)))?;

    let record = parse(&text, &origin)?;
    log::info!(
        "Loaded {} ({} content globs, {} plugins, {} safelist entries)",
        origin,
        record.content.len(),
        record.plugins.len(),
        record.safelist.len()
    );
    Ok(record)
}

/// Directory that relative paths in the document at `path` are resolved against.
pub fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Walks from `start` up through its ancestors looking for [`CONFIG_FILE_NAME`].
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

impl ConfigurationRecord {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        parse(text, INLINE_ORIGIN)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::malformed(INLINE_ORIGIN, e))
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.content.is_empty() {
            return Err("`content` must list at least one glob".to_string());
        }
        if self.content.iter().all(|g| g.starts_with('!')) {
            return Err("`content` has only exclusion globs".to_string());
        }
        for pattern in &self.content {
            let glob = pattern.strip_prefix('!').unwrap_or(pattern);
            if glob.trim().is_empty() {
                return Err("`content` contains an empty glob".to_string());
            }
            Glob::new(glob).map_err(|e| format!("invalid content glob `{}`: {}", pattern, e))?;
        }
        if let Some(reference) = self.plugins.iter().find(|p| p.trim().is_empty()) {
            return Err(format!("empty plugin reference {:?}", reference));
        }
        if self.blocklist.iter().any(|b| b.trim().is_empty()) {
            return Err("`blocklist` contains an empty class name".to_string());
        }
        Ok(())
    }
}

fn parse(text: &str, origin: &str) -> Result<ConfigurationRecord, ConfigError> {
    let record: ConfigurationRecord =
        toml::from_str(text).map_err(|e| ConfigError::malformed(origin, e.message()))?;
    record
        .validate()
        .map_err(|reason| ConfigError::malformed(origin, reason))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::DarkMode;

    const STORE: &str = r#"
content = ["../templates/*.html"]
darkMode = "selector"
plugins = ["@tailwindcss/forms", "./nightwind/plugin.toml"]
safelist = [
  "safelisted",
  { pattern = "^(text-[a-z]+-600|border-[a-z]+-400)$" },
]
"#;

    #[test]
    fn parses_store_document() {
        let record = ConfigurationRecord::from_toml_str(STORE).unwrap();
        assert_eq!(record.content, vec!["../templates/*.html"]);
        assert_eq!(record.dark_mode, Some(DarkMode::Selector(None)));
        assert_eq!(record.plugins.len(), 2);
        assert_eq!(record.safelist.len(), 2);
        assert!(record.theme.is_none());
        assert!(record.blocklist.is_empty());
    }

    #[test]
    fn missing_content_is_malformed() {
        let err = ConfigurationRecord::from_toml_str("plugins = []").unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn content_of_wrong_shape_is_malformed() {
        let err = ConfigurationRecord::from_toml_str("content = \"*.html\"").unwrap_err();
        assert!(err.is_malformed());
        let err = ConfigurationRecord::from_toml_str("content = [1, 2]").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn empty_or_exclusion_only_content_is_malformed() {
        let err = ConfigurationRecord::from_toml_str("content = []").unwrap_err();
        assert!(err.to_string().contains("at least one glob"));
        let err = ConfigurationRecord::from_toml_str("content = [\"!*.md\"]").unwrap_err();
        assert!(err.to_string().contains("only exclusion globs"));
    }

    #[test]
    fn invalid_glob_is_malformed() {
        let err = ConfigurationRecord::from_toml_str("content = [\"src/[a-.html\"]").unwrap_err();
        assert!(err.to_string().contains("invalid content glob"));
    }

    #[test]
    fn unknown_key_is_malformed() {
        let text = "content = [\"*.html\"]\nsafeList = []";
        let err = ConfigurationRecord::from_toml_str(text).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn round_trips_through_toml() {
        let record = ConfigurationRecord::from_toml_str(STORE).unwrap();
        let text = record.to_toml_string().unwrap();
        assert_eq!(ConfigurationRecord::from_toml_str(&text).unwrap(), record);
    }

    #[test]
    fn config_dir_of_bare_file_name_is_cwd() {
        assert_eq!(config_dir(Path::new("stylekit.toml")), PathBuf::from("."));
        assert_eq!(
            config_dir(Path::new("site/assets/stylekit.toml")),
            PathBuf::from("site/assets")
        );
    }
}
