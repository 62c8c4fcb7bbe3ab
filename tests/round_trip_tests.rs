//! Property test: serializing a valid record and loading it back is lossless

use proptest::prelude::*;
use stylekit::{ConfigurationRecord, DarkMode, Safelist, SafelistEntry};

fn class_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(-[a-z0-9]{1,6}){0,2}"
}

fn dark_mode() -> impl Strategy<Value = Option<DarkMode>> {
    prop_oneof![
        Just(None),
        Just(Some(DarkMode::Media)),
        Just(Some(DarkMode::Class(None))),
        Just(Some(DarkMode::Selector(None))),
        Just(Some(DarkMode::Selector(Some(".night".to_string())))),
    ]
}

fn record() -> impl Strategy<Value = ConfigurationRecord> {
    (
        prop::collection::vec("[a-z]{1,8}/\\*\\.(html|js)", 1..4),
        dark_mode(),
        prop::collection::vec(class_name(), 0..6),
        prop::collection::vec(class_name(), 0..3),
        any::<bool>(),
    )
        .prop_map(|(content, dark_mode, literals, blocklist, with_pattern)| {
            let mut entries: Vec<SafelistEntry> =
                literals.into_iter().map(SafelistEntry::literal).collect();
            if with_pattern {
                entries.push(
                    SafelistEntry::pattern("^(text-[a-z]+-600|border-[a-z]+-400)$").unwrap(),
                );
            }
            ConfigurationRecord {
                content,
                dark_mode,
                plugins: vec!["@tailwindcss/forms".to_string()],
                safelist: Safelist::from(entries),
                blocklist,
                theme: None,
            }
        })
}

proptest! {
    #[test]
    fn load_of_serialized_record_is_identity(record in record()) {
        let text = record.to_toml_string().unwrap();
        let loaded = ConfigurationRecord::from_toml_str(&text).unwrap();
        prop_assert_eq!(&loaded, &record);
    }

    #[test]
    fn every_literal_is_safelisted(record in record()) {
        for entry in record.safelist.entries() {
            if let SafelistEntry::Literal(name) = entry {
                prop_assert!(stylekit::matches_safelist(&record, name));
            }
        }
    }
}
