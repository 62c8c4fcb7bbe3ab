use crate::app::models::{ConfigurationRecord, ContentFile};
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Expands the `content` globs of a record into the files they select.
pub struct Scanner {
    base_dir: PathBuf,
    roots: Vec<GlobRoot>,
    exclude_set: GlobSet,
}

/// One include glob split into the literal directory it starts from and the
/// remaining pattern, matched against paths relative to that directory.
struct GlobRoot {
    dir: PathBuf,
    matcher: GlobSet,
    pattern: String,
    /// `None` when the pattern contains `**`.
    max_depth: Option<usize>,
}

impl Scanner {
    pub fn new(base_dir: PathBuf, record: &ConfigurationRecord) -> Result<Self> {
        let mut roots = Vec::new();
        let mut excludes = Vec::new();

        for pattern in &record.content {
            match pattern.strip_prefix('!') {
                Some(negated) => excludes.push(normalize(negated)),
                None => {
                    let (prefix, rest) = split_literal_prefix(pattern);
                    let max_depth = if rest.contains("**") {
                        None
                    } else {
                        Some(rest.split('/').count())
                    };
                    roots.push(GlobRoot {
                        // an absolute prefix replaces `base_dir`
                        dir: base_dir.join(prefix),
                        matcher: build_globset(std::slice::from_ref(&rest))?,
                        pattern: pattern.clone(),
                        max_depth,
                    });
                }
            }
        }

        Ok(Self {
            base_dir,
            roots,
            exclude_set: build_globset(&excludes)?,
        })
    }

    /// Files matching any include glob and no exclusion, sorted and de-duplicated.
    pub fn scan(&self) -> Vec<ContentFile> {
        let mut found = BTreeMap::new();

        for root in &self.roots {
            if !root.dir.is_dir() {
                log::warn!(
                    "Content glob `{}` starts at missing directory {}",
                    root.pattern,
                    root.dir.display()
                );
                continue;
            }

            let before = found.len();
            let walker = WalkBuilder::new(&root.dir)
                .hidden(false)
                .git_ignore(true)
                .max_depth(root.max_depth)
                .build();

            for result in walker {
                match result {
                    Ok(entry) => {
                        if let Some(file) = self.process_entry(root, entry.path()) {
                            found.entry(file.path.clone()).or_insert(file);
                        }
                    }
                    Err(err) => log::warn!("Error walking entry: {}", err),
                }
            }

            log::debug!(
                "Content glob `{}` selected {} new files",
                root.pattern,
                found.len() - before
            );
        }

        found.into_values().collect()
    }

    fn process_entry(&self, root: &GlobRoot, path: &Path) -> Option<ContentFile> {
        if path.is_dir() || path.components().any(|c| c.as_os_str() == ".git") {
            return None;
        }

        let within_root = diff_paths(path, &root.dir)?;
        if !root.matcher.is_match(&within_root) {
            return None;
        }

        let relative = diff_paths(path, &self.base_dir).unwrap_or_else(|| path.to_path_buf());
        let relative_path = normalize(&relative.to_string_lossy());
        let full_path = normalize(&path.to_string_lossy());
        if self.exclude_set.is_match(&relative_path) || self.exclude_set.is_match(&full_path) {
            return None;
        }

        Some(ContentFile {
            path: path.to_path_buf(),
            relative_path,
        })
    }
}

/// Expands the `content` globs of `record` against `base_dir`.
pub fn content_files(record: &ConfigurationRecord, base_dir: &Path) -> Result<Vec<ContentFile>> {
    let scanner = Scanner::new(base_dir.to_path_buf(), record)?;
    Ok(scanner.scan())
}

/// Splits `../templates/**/*.html` into (`../templates`, `**/*.html`).
/// Root and drive prefixes stay in the literal part.
fn split_literal_prefix(pattern: &str) -> (PathBuf, String) {
    let pattern = pattern.replace('\\', "/");
    let components: Vec<Component> = Path::new(&pattern)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let literal = components
        .iter()
        .take(components.len().saturating_sub(1))
        .take_while(|c| match c {
            Component::Normal(segment) => !has_glob_meta(&segment.to_string_lossy()),
            _ => true,
        })
        .count();

    let prefix: PathBuf = components[..literal].iter().collect();
    let rest = components[literal..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    (prefix, rest)
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', ']', '{', '}'])
}

fn normalize(pattern: &str) -> String {
    let pattern = pattern.replace('\\', "/");
    let trimmed: PathBuf = Path::new(&pattern)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    trimmed.to_string_lossy().replace('\\', "/")
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        // `*` stays within one path segment
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid content glob: {}", pat))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
