use thiserror::Error;

/// Errors reported by the strict translation entry points.
///
/// Both variants describe the shape of the record type, not the data it
/// carries. They are produced once when the type's metadata is built and
/// cached with it, so every later lookup reports the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("type {0} has no translation table field")]
    MissingTable(&'static str),
    #[error("type {0} has no localizable fields")]
    NoLocalizableFields(&'static str),
}
