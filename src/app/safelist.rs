use crate::app::models::ConfigurationRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One safelist entry. Patterns are compiled once, when the document is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawSafelistEntry", into = "RawSafelistEntry")]
pub enum SafelistEntry {
    Literal(String),
    Pattern { regex: Regex, variants: Vec<String> },
}

/// On-disk shape: a bare string, or a `{ pattern, variants }` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSafelistEntry {
    Literal(String),
    Pattern(PatternTable),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternTable {
    pattern: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    variants: Vec<String>,
}

impl TryFrom<RawSafelistEntry> for SafelistEntry {
    type Error = String;

    fn try_from(raw: RawSafelistEntry) -> Result<Self, Self::Error> {
        match raw {
            RawSafelistEntry::Literal(name) => {
                if name.trim().is_empty() {
                    return Err("safelist literal must not be empty".to_string());
                }
                Ok(Self::Literal(name))
            }
            RawSafelistEntry::Pattern(PatternTable { pattern, variants }) => {
                let regex = Regex::new(&pattern)
                    .map_err(|e| format!("invalid safelist pattern `{}`: {}", pattern, e))?;
                if let Some(empty) = variants.iter().find(|v| v.trim().is_empty()) {
                    return Err(format!(
                        "safelist pattern `{}` lists an empty variant {:?}",
                        pattern, empty
                    ));
                }
                Ok(Self::Pattern { regex, variants })
            }
        }
    }
}

impl From<SafelistEntry> for RawSafelistEntry {
    fn from(entry: SafelistEntry) -> Self {
        match entry {
            SafelistEntry::Literal(name) => Self::Literal(name),
            SafelistEntry::Pattern { regex, variants } => Self::Pattern(PatternTable {
                pattern: regex.as_str().to_string(),
                variants,
            }),
        }
    }
}

impl PartialEq for SafelistEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (
                Self::Pattern {
                    regex: a,
                    variants: va,
                },
                Self::Pattern {
                    regex: b,
                    variants: vb,
                },
            ) => a.as_str() == b.as_str() && va == vb,
            _ => false,
        }
    }
}

impl Eq for SafelistEntry {}

impl SafelistEntry {
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern {
            regex: Regex::new(pattern)?,
            variants: Vec::new(),
        })
    }

    /// Whether this entry retains `class_name`.
    ///
    /// A pattern entry also retains `<variant>:<class>` for each of its variants.
    /// The variant prefix is everything before the last `:`.
    pub fn matches(&self, class_name: &str) -> bool {
        match self {
            Self::Literal(name) => name == class_name,
            Self::Pattern { regex, variants } => {
                if regex.is_match(class_name) {
                    return true;
                }
                match class_name.rsplit_once(':') {
                    Some((prefix, base)) => {
                        variants.iter().any(|v| v == prefix) && regex.is_match(base)
                    }
                    None => false,
                }
            }
        }
    }
}

/// Ordered safelist with a literal lookup set built at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SafelistEntry>", into = "Vec<SafelistEntry>")]
pub struct Safelist {
    entries: Vec<SafelistEntry>,
    literals: HashSet<String>,
}

impl From<Vec<SafelistEntry>> for Safelist {
    fn from(entries: Vec<SafelistEntry>) -> Self {
        let literals = entries
            .iter()
            .filter_map(|e| match e {
                SafelistEntry::Literal(name) => Some(name.clone()),
                SafelistEntry::Pattern { .. } => None,
            })
            .collect();
        Self { entries, literals }
    }
}

impl From<Safelist> for Vec<SafelistEntry> {
    fn from(list: Safelist) -> Self {
        list.entries
    }
}

impl PartialEq for Safelist {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Safelist {}

impl Safelist {
    pub fn entries(&self) -> &[SafelistEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &SafelistEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, SafelistEntry::Pattern { .. }))
    }

    /// Literal membership first, then each pattern in declaration order.
    pub fn matches(&self, class_name: &str) -> bool {
        if self.literals.contains(class_name) {
            return true;
        }
        self.patterns().any(|p| p.matches(class_name))
    }
}

/// True if `class_name` is a literal safelist entry or matches a safelist pattern.
pub fn matches_safelist(record: &ConfigurationRecord, class_name: &str) -> bool {
    record.safelist.matches(class_name)
}

pub fn is_blocked(record: &ConfigurationRecord, class_name: &str) -> bool {
    record.blocklist.iter().any(|b| b == class_name)
}

/// Retain decision for one generated class: the blocklist wins, then the
/// safelist, then whether scanning detected the class.
pub fn retains(record: &ConfigurationRecord, class_name: &str, detected: bool) -> bool {
    if is_blocked(record, class_name) {
        return false;
    }
    detected || matches_safelist(record, class_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PATTERN: &str = "^(text-[a-z]+-600|border-[a-z]+-400)$";

    fn sample() -> Safelist {
        Safelist::from(vec![
            SafelistEntry::literal("safelisted"),
            SafelistEntry::pattern(SAMPLE_PATTERN).unwrap(),
        ])
    }

    #[test]
    fn literal_entry_matches_exactly() {
        let list = sample();
        assert!(list.matches("safelisted"));
        assert!(!list.matches("safelisted-extra"));
        assert!(!list.matches("safe"));
    }

    #[test]
    fn pattern_entry_uses_regex_semantics() {
        let list = sample();
        assert!(list.matches("text-red-600"));
        assert!(!list.matches("text-red-500"));
        assert!(list.matches("border-blue-400"));
        assert!(!list.matches("border-blue-500"));
        // anchored, so a longer name containing a match is rejected
        assert!(!list.matches("hover-text-red-600-x"));
    }

    #[test]
    fn unanchored_pattern_searches_class_name() {
        let entry = SafelistEntry::pattern("bg-.+-50").unwrap();
        assert!(entry.matches("bg-red-50"));
        assert!(entry.matches("hover:bg-sky-500"));
        assert!(!entry.matches("bg--50"));
    }

    #[test]
    fn variants_extend_pattern_matches() {
        let raw = RawSafelistEntry::Pattern(PatternTable {
            pattern: SAMPLE_PATTERN.to_string(),
            variants: vec!["hover".to_string(), "lg:hover".to_string()],
        });
        let entry = SafelistEntry::try_from(raw).unwrap();
        assert!(entry.matches("hover:text-red-600"));
        assert!(entry.matches("lg:hover:border-blue-400"));
        assert!(!entry.matches("focus:text-red-600"));
        assert!(!entry.matches("hover:text-red-500"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let raw = RawSafelistEntry::Pattern(PatternTable {
            pattern: "^(text-".to_string(),
            variants: Vec::new(),
        });
        let err = SafelistEntry::try_from(raw).unwrap_err();
        assert!(err.contains("invalid safelist pattern"));
    }

    #[test]
    fn misspelled_pattern_key_is_malformed() {
        let err = ConfigurationRecord::from_toml_str(
            r#"
content = ["*.html"]
safelist = [{ pattern = "^(text-[a-z]+-600)$", varients = ["hover"] }]
"#,
        )
        .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn pattern_table_variants_load_from_toml() {
        let record = ConfigurationRecord::from_toml_str(
            r#"
content = ["*.html"]
safelist = [{ pattern = "^(text-[a-z]+-600)$", variants = ["hover"] }]
"#,
        )
        .unwrap();
        assert!(matches_safelist(&record, "hover:text-red-600"));
    }

    #[test]
    fn empty_literal_is_rejected() {
        let err = SafelistEntry::try_from(RawSafelistEntry::Literal("  ".to_string())).unwrap_err();
        assert!(err.contains("must not be empty"));
    }

    #[test]
    fn blocklist_beats_safelist_and_detection() {
        let mut record = ConfigurationRecord::from_toml_str(
            "content = [\"*.html\"]\nsafelist = [\"safelisted\"]\nblocklist = [\"container\"]",
        )
        .unwrap();
        assert!(retains(&record, "safelisted", false));
        assert!(retains(&record, "flex", true));
        assert!(!retains(&record, "flex", false));
        assert!(!retains(&record, "container", true));

        record.blocklist.push("safelisted".to_string());
        assert!(is_blocked(&record, "safelisted"));
        assert!(!retains(&record, "safelisted", true));
    }

    #[test]
    fn equality_compares_pattern_source() {
        assert_eq!(sample(), sample());
        let other = Safelist::from(vec![SafelistEntry::pattern("^text-.*$").unwrap()]);
        assert_ne!(sample(), other);
    }
}
