use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derives `glossa_core::Localizable` for a struct with named fields.
///
/// Field markers:
/// - `#[localize]` — output field, translation key is the field's own name
/// - `#[localize(key = "...")]` — output field with an explicit key
/// - `#[localize(table)]` — the field carrying the `TranslationTable`
///
/// ```ignore
/// #[derive(Localizable)]
/// struct Character {
///     #[localize]
///     name: String,
///     #[localize(key = "element")]
///     kind: String,
///     #[localize(table)]
///     translations: TranslationTable,
/// }
/// ```
///
/// Marked output fields must be `String`: the generated writer assigns the
/// negotiated value directly.
#[proc_macro_derive(Localizable, attributes(localize))]
pub fn derive_localizable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

enum Marker {
    Field(Option<String>),
    Table,
}

fn parse_marker(attr: &syn::Attribute) -> syn::Result<Marker> {
    if let syn::Meta::Path(_) = attr.meta {
        return Ok(Marker::Field(None));
    }

    let mut key = None;
    let mut table = false;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("key") {
            let value: LitStr = meta.value()?.parse()?;
            key = Some(value.value());
            Ok(())
        } else if meta.path.is_ident("table") {
            table = true;
            Ok(())
        } else {
            Err(meta.error("expected `key = \"...\"` or `table`"))
        }
    })?;

    if table {
        Ok(Marker::Table)
    } else {
        Ok(Marker::Field(key))
    }
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "Localizable can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            name,
            "Localizable requires named fields",
        ));
    };

    let mut field_specs = Vec::new();
    let mut write_arms = Vec::new();
    let mut table_ident = None;
    let mut table_index = None;

    for (index, field) in fields.named.iter().enumerate() {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        for attr in &field.attrs {
            if !attr.path().is_ident("localize") {
                continue;
            }

            match parse_marker(attr)? {
                Marker::Table => {
                    // First marked table field wins.
                    if table_ident.is_none() {
                        table_ident = Some(ident.clone());
                        table_index = Some(index);
                    }
                }
                Marker::Field(key) => {
                    let field_name = ident.to_string();
                    let key = key.unwrap_or_else(|| field_name.clone());
                    field_specs.push(quote! {
                        ::glossa_core::FieldSpec {
                            name: #field_name,
                            key: #key,
                            index: #index,
                        }
                    });
                    write_arms.push(quote! {
                        #index => self.#ident = value.to_owned(),
                    });
                }
            }
        }
    }

    let table_index_tokens = match table_index {
        Some(index) => quote!(Some(#index)),
        None => quote!(None),
    };
    let table_fn = table_ident.map(|ident| {
        quote! {
            fn table(&self) -> Option<&::glossa_core::TranslationTable> {
                Some(&self.#ident)
            }
        }
    });
    // Types with no marked output fields keep the trait's no-op writer.
    let write_fn = (!write_arms.is_empty()).then(|| {
        quote! {
            fn write_field(&mut self, index: usize, value: &str) {
                match index {
                    #(#write_arms)*
                    _ => {}
                }
            }
        }
    });

    Ok(quote! {
        impl ::glossa_core::Localizable for #name {
            fn spec() -> &'static ::glossa_core::TypeSpec {
                static SPEC: ::glossa_core::TypeSpec = ::glossa_core::TypeSpec {
                    type_name: #type_name,
                    self_translating: false,
                    table_index: #table_index_tokens,
                    fields: &[ #(#field_specs),* ],
                };
                &SPEC
            }

            #table_fn

            #write_fn
        }
    })
}
