//! Localization selection for typed records.
//!
//! Records carry their translations in a [`TranslationTable`] (translation
//! key -> language code -> value). Marking fields with the `Localizable`
//! derive lets a [`Translator`] pick, per field, the stored variant that best
//! satisfies a ranked language preference list and write it into the field.
//! Nothing is ever generated: the engine only chooses which stored string to
//! expose.

pub mod error;
pub mod matcher;
pub mod meta;
pub mod settings;
pub mod table;
pub mod tag;
pub mod translator;

pub use error::TranslateError;
pub use matcher::{Candidate, Matcher, availability_key, cached_matcher_count, matcher_for};
pub use meta::{FieldSpec, Localizable, StructMetadata, TypeSpec, metadata_for};
pub use settings::{Settings, SettingsError};
pub use table::TranslationTable;
pub use translator::{
    Strategy, Translator, localize, set_default_language, set_global, try_localize,
};

pub use unic_langid::LanguageIdentifier;
