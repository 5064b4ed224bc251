use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};
use tracing::warn;
use unic_langid::LanguageIdentifier;

static TAGS: OnceLock<RwLock<HashMap<String, LanguageIdentifier>>> = OnceLock::new();

fn store() -> &'static RwLock<HashMap<String, LanguageIdentifier>> {
    TAGS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolve a raw language code into a structured identifier.
///
/// Memoized by exact string for the process lifetime. Never fails: a code
/// `unic-langid` rejects degrades to its leading alphabetic run, and failing
/// that to the undetermined identifier, so one malformed stored code cannot
/// abort resolution of the other fields of a record.
pub fn resolve(code: &str) -> LanguageIdentifier {
    {
        let tags = store().read().unwrap_or_else(|e| e.into_inner());
        if let Some(tag) = tags.get(code) {
            return tag.clone();
        }
    }

    let tag = parse_lenient(code);

    let mut tags = store().write().unwrap_or_else(|e| e.into_inner());
    tags.entry(code.to_owned()).or_insert_with(|| tag.clone());
    tag
}

fn parse_lenient(code: &str) -> LanguageIdentifier {
    if let Ok(tag) = code.parse() {
        return tag;
    }

    warn!("unparseable language code {:?}, falling back to best-effort tag", code);
    let primary: String = code
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    primary.parse().unwrap_or_default()
}
