use crate::app::models::{ConfigurationRecord, ContentFile};
use crate::app::plugins::{contributed_classes, PluginHandle, PluginOrigin};
use crate::app::safelist::{is_blocked, matches_safelist};
use std::path::Path;

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn generate_summary(
        path: &Path,
        record: &ConfigurationRecord,
        plugins: &[PluginHandle],
        files: &[ContentFile],
    ) -> String {
        let mut output = format!("{}: ok\n", path.display());
        output.push_str(&format!(
            "  content:   {} globs, {} files\n",
            record.content.len(),
            files.len()
        ));
        if let Some(mode) = &record.dark_mode {
            output.push_str(&format!("  darkMode:  {}\n", mode.variant_rule()));
        }
        if let Some(theme) = &record.theme {
            let extended = theme.extend.as_ref().map_or(0, |t| t.len());
            output.push_str(&format!(
                "  theme:     {} extended, {} overridden\n",
                extended,
                theme.overrides.len()
            ));
        }
        output.push_str(&format!("  plugins:   {}\n", plugins.len()));
        output.push_str(&format!("  safelist:  {} entries\n", record.safelist.len()));
        if !record.blocklist.is_empty() {
            output.push_str(&format!("  blocklist: {} classes\n", record.blocklist.len()));
        }

        output.trim_end().to_string()
    }

    pub fn generate_content(files: &[ContentFile]) -> String {
        files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn generate_plugins(plugins: &[PluginHandle]) -> String {
        let mut blocks = Vec::new();

        for handle in plugins {
            let origin = match &handle.origin {
                PluginOrigin::Builtin => "builtin".to_string(),
                PluginOrigin::Local(path) => path.display().to_string(),
            };
            blocks.push(format!(
                "{} ({}, {})",
                handle.plugin.name(),
                handle.reference,
                origin
            ));
        }

        let classes = contributed_classes(plugins);
        if !classes.is_empty() {
            blocks.push(String::new());
            for (class, owner) in &classes {
                blocks.push(format!("    {:<24} {}", class, owner));
            }
        }

        blocks.join("\n")
    }

    pub fn generate_safelist(record: &ConfigurationRecord, classes: &[String]) -> String {
        classes
            .iter()
            .map(|class| {
                let verdict = if is_blocked(record, class) {
                    "blocked"
                } else if matches_safelist(record, class) {
                    "retained"
                } else {
                    "not safelisted"
                };
                format!("{}: {}", class, verdict)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
