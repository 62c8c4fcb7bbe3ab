use crate::app::safelist::Safelist;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A parsed configuration document for one site.
///
/// Pure data: it is read once per build and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigurationRecord {
    /// Globs, relative to the document's directory, selecting files to scan.
    /// A leading `!` excludes.
    pub content: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<DarkMode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    #[serde(default, skip_serializing_if = "Safelist::is_empty")]
    pub safelist: Safelist,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocklist: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// How dark-theme variants are triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDarkMode", into = "RawDarkMode")]
pub enum DarkMode {
    Media,
    /// Custom selector, `.dark` when absent.
    Class(Option<String>),
    Selector(Option<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawDarkMode {
    Mode(String),
    Custom(Vec<String>),
}

impl TryFrom<RawDarkMode> for DarkMode {
    type Error = String;

    fn try_from(raw: RawDarkMode) -> Result<Self, Self::Error> {
        match raw {
            RawDarkMode::Mode(mode) => match mode.as_str() {
                "media" => Ok(Self::Media),
                "class" => Ok(Self::Class(None)),
                "selector" => Ok(Self::Selector(None)),
                other => Err(format!(
                    "unknown darkMode `{}` (expected media, class or selector)",
                    other
                )),
            },
            RawDarkMode::Custom(parts) => match parts.as_slice() {
                [mode, selector] if !selector.trim().is_empty() => match mode.as_str() {
                    "class" => Ok(Self::Class(Some(selector.clone()))),
                    "selector" => Ok(Self::Selector(Some(selector.clone()))),
                    other => Err(format!(
                        "darkMode `{}` does not take a custom selector",
                        other
                    )),
                },
                _ => Err("darkMode array must be [\"class\" | \"selector\", \"<selector>\"]"
                    .to_string()),
            },
        }
    }
}

impl From<DarkMode> for RawDarkMode {
    fn from(mode: DarkMode) -> Self {
        match mode {
            DarkMode::Media => Self::Mode("media".to_string()),
            DarkMode::Class(None) => Self::Mode("class".to_string()),
            DarkMode::Selector(None) => Self::Mode("selector".to_string()),
            DarkMode::Class(Some(sel)) => Self::Custom(vec!["class".to_string(), sel]),
            DarkMode::Selector(Some(sel)) => Self::Custom(vec!["selector".to_string(), sel]),
        }
    }
}

impl DarkMode {
    pub const DEFAULT_SELECTOR: &'static str = ".dark";

    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Media => None,
            Self::Class(sel) | Self::Selector(sel) => {
                Some(sel.as_deref().unwrap_or(Self::DEFAULT_SELECTOR))
            }
        }
    }

    /// The rule dark variants are wrapped in; `&` stands for the styled element.
    pub fn variant_rule(&self) -> String {
        match self {
            Self::Media => "@media (prefers-color-scheme: dark)".to_string(),
            Self::Class(_) => format!("{} &", self.selector().unwrap_or_default()),
            Self::Selector(_) => {
                let sel = self.selector().unwrap_or_default();
                format!("&:where({}, {} *)", sel, sel)
            }
        }
    }
}

/// Design token overrides. `extend` merges into defaults, other keys replace them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<toml::Table>,

    #[serde(flatten)]
    pub overrides: toml::Table,
}

/// A plugin manifest on disk, describing what a local plugin contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

/// A content file selected by the `content` globs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    pub path: PathBuf,
    /// Path relative to the document's directory, `/`-separated.
    pub relative_path: String,
}
