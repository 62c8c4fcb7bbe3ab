use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a configuration document or resolving its plugins.
///
/// Both kinds are fatal: a build must not proceed with a partially valid record.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration {origin}: {reason}")]
    Malformed { origin: String, reason: String },

    #[error("cannot resolve plugin `{reference}` (searched: {})", SearchedPaths(.searched))]
    PluginResolution {
        reference: String,
        searched: Vec<PathBuf>,
    },
}

impl ConfigError {
    pub fn malformed(origin: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Malformed {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }

    pub fn plugin_resolution(reference: impl Into<String>, searched: Vec<PathBuf>) -> Self {
        Self::PluginResolution {
            reference: reference.into(),
            searched,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    pub fn is_plugin_resolution(&self) -> bool {
        matches!(self, Self::PluginResolution { .. })
    }
}

struct SearchedPaths<'a>(&'a [PathBuf]);

impl fmt::Display for SearchedPaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("plugin registry");
        }
        let joined: Vec<String> = self.0.iter().map(|p| p.display().to_string()).collect();
        f.write_str(&joined.join(", "))
    }
}
