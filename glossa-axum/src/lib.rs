//! Carries each request's `Accept-Language` preferences into the task so
//! records can be localized anywhere in the handler stack without threading
//! the list through arguments.

pub mod locale;
pub use locale::{PREFERRED_LANGUAGES, handle_locale, localize, preferred_languages};
