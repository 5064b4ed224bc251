use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::error::TranslateError;
use crate::table::TranslationTable;

/// One localizable output field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Translation key; the derive substitutes the field's own name when the
    /// marker does not supply one.
    pub key: &'static str,
    /// Declaration index, used for write dispatch.
    pub index: usize,
}

/// Static descriptor of a record type.
///
/// Emitted by the `Localizable` derive for table-driven types, or written by
/// hand (usually through [`TypeSpec::self_translating`]) for types that
/// translate themselves.
#[derive(Debug, Clone, Copy)]
pub struct TypeSpec {
    pub type_name: &'static str,
    pub self_translating: bool,
    /// Declaration index of the field supplying the translation table; when
    /// several fields are marked, the first in declaration order wins.
    pub table_index: Option<usize>,
    /// Localizable fields in declaration order.
    pub fields: &'static [FieldSpec],
}

impl TypeSpec {
    /// Descriptor for a type that translates itself through
    /// [`Localizable::localize_with`].
    pub const fn self_translating(type_name: &'static str) -> Self {
        Self {
            type_name,
            self_translating: true,
            table_index: None,
            fields: &[],
        }
    }
}

/// A record whose string fields can be swapped to a stored language variant.
///
/// Table-driven types get this from `#[derive(Localizable)]`; self-translating
/// types implement it by hand and override [`Localizable::localize_with`].
pub trait Localizable: 'static {
    fn spec() -> &'static TypeSpec
    where
        Self: Sized;

    /// The translation table carried by the record, when table-driven.
    fn table(&self) -> Option<&TranslationTable> {
        None
    }

    /// Write a negotiated value into the field at declaration index `index`.
    fn write_field(&mut self, index: usize, value: &str) {
        let _ = (index, value);
    }

    /// Capability hook for self-translating types. `preferred` is never
    /// empty: callers substitute the default language first.
    fn localize_with(&mut self, preferred: &[LanguageIdentifier]) {
        let _ = preferred;
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Source {
    /// The type translates itself through the capability hook.
    Capability,
    /// Values come from the table field and land in the listed fields.
    Table {
        table_index: usize,
        fields: &'static [FieldSpec],
    },
}

/// Translation shape of one record type, built once and shared read-only.
///
/// An unusable shape is remembered here as well, so repeated lookups stay
/// O(1) and always report the same error.
#[derive(Debug, PartialEq, Eq)]
pub struct StructMetadata {
    type_name: &'static str,
    source: Result<Source, TranslateError>,
}

impl StructMetadata {
    fn build(spec: &TypeSpec) -> Self {
        let source = if spec.self_translating {
            Ok(Source::Capability)
        } else {
            match spec.table_index {
                None => Err(TranslateError::MissingTable(spec.type_name)),
                Some(_) if spec.fields.is_empty() => {
                    Err(TranslateError::NoLocalizableFields(spec.type_name))
                }
                Some(table_index) => Ok(Source::Table {
                    table_index,
                    fields: spec.fields,
                }),
            }
        };

        Self {
            type_name: spec.type_name,
            source,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The error recorded at build time, if the shape was unusable.
    pub fn build_error(&self) -> Option<TranslateError> {
        self.source.as_ref().err().copied()
    }

    pub fn is_self_translating(&self) -> bool {
        matches!(self.source, Ok(Source::Capability))
    }

    /// Localizable fields in declaration order; empty for self-translating
    /// and unsupported types.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self.source {
            Ok(Source::Table { fields, .. }) => fields,
            _ => &[],
        }
    }

    pub(crate) fn source(&self) -> Result<&Source, TranslateError> {
        self.source.as_ref().map_err(|err| *err)
    }
}

static METAS: OnceLock<RwLock<HashMap<TypeId, Arc<StructMetadata>>>> = OnceLock::new();

fn store() -> &'static RwLock<HashMap<TypeId, Arc<StructMetadata>>> {
    METAS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Metadata for `T`, built on first sight and cached for the process
/// lifetime.
///
/// The build is a pure function of the type, so racing first lookups may
/// build twice; whichever insert lands first wins and the results are
/// identical either way.
pub fn metadata_for<T: Localizable>() -> Arc<StructMetadata> {
    let type_id = TypeId::of::<T>();

    {
        let metas = store().read().unwrap_or_else(|e| e.into_inner());
        if let Some(meta) = metas.get(&type_id) {
            return meta.clone();
        }
    }

    let built = Arc::new(StructMetadata::build(T::spec()));
    debug!("built translation metadata for {}", built.type_name);

    let mut metas = store().write().unwrap_or_else(|e| e.into_inner());
    metas.entry(type_id).or_insert(built).clone()
}
