use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use fluent_langneg::{NegotiationStrategy, negotiate_languages};
use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::tag;

/// One available language inside a [`Matcher`]: the raw stored code plus its
/// resolved identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    code: String,
    langid: LanguageIdentifier,
}

impl Candidate {
    /// The language code exactly as it appears in the translation table.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl AsRef<LanguageIdentifier> for Candidate {
    fn as_ref(&self) -> &LanguageIdentifier {
        &self.langid
    }
}

/// Negotiates preference lists against one availability set.
///
/// Candidates keep the canonical key order: the default language first when
/// the set contains it, so it doubles as the fallback anchor; otherwise the
/// fallback is the first code in canonical order.
#[derive(Debug)]
pub struct Matcher {
    candidates: Vec<Candidate>,
}

impl Matcher {
    fn build(key: &[String]) -> Self {
        let candidates = key
            .iter()
            .map(|code| Candidate {
                code: code.clone(),
                langid: tag::resolve(code),
            })
            .collect();
        Self { candidates }
    }

    /// The best available language for `preferred`.
    ///
    /// Walks the preferences in priority order, taking an exact match over a
    /// same-base-language variant, and falls back to the anchor candidate
    /// when nothing matches (including an empty preference list). Returns
    /// `None` only for a matcher over an empty availability set, which the
    /// caches never produce.
    pub fn select(&self, preferred: &[LanguageIdentifier]) -> Option<&Candidate> {
        negotiate_languages(
            preferred,
            &self.candidates,
            self.candidates.first(),
            NegotiationStrategy::Lookup,
        )
        .into_iter()
        .next()
    }
}

/// Canonical, order-independent encoding of an availability set.
///
/// The default language comes first when present; the remaining codes follow
/// in lexicographic order, deduplicated. Two sets with the same members yield
/// the same key no matter how their maps iterate, and the whole set is kept:
/// nothing is truncated away from either the key or the negotiation input.
pub fn availability_key<'a, I>(codes: I, default_code: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut has_default = false;
    let mut rest: Vec<&str> = Vec::new();

    for code in codes {
        if code == default_code {
            has_default = true;
        } else {
            rest.push(code);
        }
    }

    rest.sort_unstable();
    rest.dedup();

    let mut key = Vec::with_capacity(rest.len() + 1);
    if has_default {
        key.push(default_code.to_owned());
    }
    key.extend(rest.into_iter().map(str::to_owned));
    key
}

static MATCHERS: OnceLock<RwLock<HashMap<Vec<String>, Arc<Matcher>>>> = OnceLock::new();

fn store() -> &'static RwLock<HashMap<Vec<String>, Arc<Matcher>>> {
    MATCHERS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Matcher for a canonical availability key, cached for the process lifetime.
///
/// Misses build outside the lock; racing builds for the same key are
/// identical and the first insert wins.
pub fn matcher_for(key: &[String]) -> Arc<Matcher> {
    {
        let matchers = store().read().unwrap_or_else(|e| e.into_inner());
        if let Some(matcher) = matchers.get(key) {
            return matcher.clone();
        }
    }

    let built = Arc::new(Matcher::build(key));
    debug!("built language matcher for {:?}", key);

    let mut matchers = store().write().unwrap_or_else(|e| e.into_inner());
    matchers.entry(key.to_vec()).or_insert(built).clone()
}

/// Number of distinct availability shapes negotiated so far.
pub fn cached_matcher_count() -> usize {
    store().read().unwrap_or_else(|e| e.into_inner()).len()
}
