use std::sync::{OnceLock, RwLock};

use serde::Deserialize;
use unic_langid::LanguageIdentifier;

use crate::error::TranslateError;
use crate::matcher::{availability_key, matcher_for};
use crate::meta::{Localizable, Source, metadata_for};
use crate::settings::Settings;
use crate::tag;

/// How the fields of one record relate to the negotiated language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Negotiate each field against its own key's availability set. A record
    /// may end up with fields in different languages when a preferred
    /// language covers it only partially.
    #[default]
    Independent,
    /// Negotiate once over the union of the record's available languages and
    /// read every field at that single language. Fields whose key lacks that
    /// language keep their current value.
    Unified,
}

/// Applies stored translations to records.
///
/// Holds the default language (used when the caller supplies no preferences
/// and as the negotiation fallback anchor) and the negotiation strategy.
/// Configured builder-style:
///
/// ```
/// use glossa_core::{Strategy, Translator};
///
/// let translator = Translator::new()
///     .default_language("de")
///     .strategy(Strategy::Independent);
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
    default_code: String,
    default_tag: LanguageIdentifier,
    strategy: Strategy,
}

impl Default for Translator {
    fn default() -> Self {
        Self {
            default_code: "en".to_owned(),
            default_tag: tag::resolve("en"),
            strategy: Strategy::Independent,
        }
    }
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default language by code.
    pub fn default_language(mut self, code: &str) -> Self {
        self.default_tag = tag::resolve(code);
        self.default_code = code.to_owned();
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .default_language(&settings.default_language)
            .strategy(settings.strategy)
    }

    /// Apply translations to `target`, reporting unusable record shapes.
    ///
    /// Empty data is not an error: an empty table, or a key with no entries,
    /// leaves the affected fields at their current values.
    pub fn try_apply<T: Localizable>(
        &self,
        target: &mut T,
        preferred: &[LanguageIdentifier],
    ) -> Result<(), TranslateError> {
        let meta = metadata_for::<T>();

        let fallback = [self.default_tag.clone()];
        let effective: &[LanguageIdentifier] =
            if preferred.is_empty() { &fallback } else { preferred };

        let fields = match meta.source()? {
            Source::Capability => {
                target.localize_with(effective);
                return Ok(());
            }
            Source::Table { fields, .. } => *fields,
        };

        // Values are collected first: they borrow the table, which borrows
        // the record we are about to mutate.
        let mut writes: Vec<(usize, String)> = Vec::new();
        {
            let Some(table) = target.table() else {
                return Ok(());
            };
            if table.is_empty() {
                return Ok(());
            }

            match self.strategy {
                Strategy::Independent => {
                    for field in fields {
                        let Some(entries) = table.entries(field.key) else {
                            continue;
                        };
                        let key =
                            availability_key(entries.keys().map(String::as_str), &self.default_code);
                        if key.is_empty() {
                            continue;
                        }

                        let matcher = matcher_for(&key);
                        if let Some(chosen) = matcher.select(effective)
                            && let Some(value) = table.get(field.key, chosen.code())
                        {
                            writes.push((field.index, value.to_owned()));
                        }
                    }
                }
                Strategy::Unified => {
                    let union = table
                        .iter()
                        .flat_map(|(_, entries)| entries.keys().map(String::as_str));
                    let key = availability_key(union, &self.default_code);
                    if key.is_empty() {
                        return Ok(());
                    }

                    let matcher = matcher_for(&key);
                    if let Some(chosen) = matcher.select(effective) {
                        for field in fields {
                            if let Some(value) = table.get(field.key, chosen.code()) {
                                writes.push((field.index, value.to_owned()));
                            }
                        }
                    }
                }
            }
        }

        for (index, value) in writes {
            target.write_field(index, &value);
        }
        Ok(())
    }

    /// Lenient flavor of [`Translator::try_apply`]: an unusable record shape
    /// is a silent no-op.
    pub fn apply<T: Localizable>(&self, target: &mut T, preferred: &[LanguageIdentifier]) {
        let _ = self.try_apply(target, preferred);
    }
}

static GLOBAL: OnceLock<RwLock<Translator>> = OnceLock::new();

fn global() -> &'static RwLock<Translator> {
    GLOBAL.get_or_init(|| RwLock::new(Translator::new()))
}

fn global_snapshot() -> Translator {
    global().read().unwrap_or_else(|e| e.into_inner()).clone()
}

/// Replace the process-wide translator.
///
/// A coarse administrative action, not synchronized against in-flight calls;
/// those finish with the translator they snapshotted.
pub fn set_global(translator: Translator) {
    *global().write().unwrap_or_else(|e| e.into_inner()) = translator;
}

/// Override only the process-wide default language.
pub fn set_default_language(code: &str) {
    let updated = global_snapshot().default_language(code);
    set_global(updated);
}

/// Apply translations with the process-wide translator, ignoring unusable
/// record shapes.
pub fn localize<T: Localizable>(target: &mut T, preferred: &[LanguageIdentifier]) {
    global_snapshot().apply(target, preferred);
}

/// Strict flavor of [`localize`].
pub fn try_localize<T: Localizable>(
    target: &mut T,
    preferred: &[LanguageIdentifier],
) -> Result<(), TranslateError> {
    global_snapshot().try_apply(target, preferred)
}
