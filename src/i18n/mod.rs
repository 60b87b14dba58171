//! Static UI strings for the three dashboard languages.

mod translations;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::Language;

static TABLE: Lazy<HashMap<&'static str, [&'static str; 3]>> =
    Lazy::new(|| translations::ENTRIES.iter().copied().collect());

/// Looks up `key` for `language`, falling back to English and then to the key itself.
pub fn translate<'a>(key: &'a str, language: Language) -> &'a str {
    match TABLE.get(key) {
        Some(values) => {
            let value = values[language.index()];
            if value.is_empty() {
                values[Language::English.index()]
            } else {
                value
            }
        }
        None => key,
    }
}

pub fn keys() -> impl Iterator<Item = &'static str> {
    translations::ENTRIES.iter().map(|(key, _)| *key)
}
