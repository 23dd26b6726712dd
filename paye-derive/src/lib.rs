use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Lit, LitStr, Meta, Type};

/// Derives the column layout of a CSV record struct.
///
/// Every named field becomes one column:
/// - name: the field name, or `#[serde(rename = "...")]` when present
/// - required: `false` for `Option<T>` fields
/// - default: the value from `#[csv(default = "...")]`, shown to users when the column is blank
/// - description: the field's doc comment
///
/// Generates `csv_columns() -> &'static [CsvColumn]` and `csv_header() -> &'static str`.
/// `CsvColumn` must be in scope at the derive site.
#[proc_macro_derive(CsvColumns, attributes(serde, csv))]
pub fn derive_csv_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvColumns requires named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvColumns only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut columns = Vec::new();
    for field in fields {
        let ident = match &field.ident {
            Some(ident) => ident.to_string(),
            None => continue,
        };
        let column = match string_arg(&field.attrs, "serde", "rename") {
            Ok(rename) => rename.unwrap_or(ident),
            Err(err) => return err.to_compile_error().into(),
        };
        let default = match string_arg(&field.attrs, "csv", "default") {
            Ok(default) => default,
            Err(err) => return err.to_compile_error().into(),
        };
        let required = !is_option(&field.ty);
        let description = doc_comment(&field.attrs);
        columns.push((column, required, default, description));
    }

    let header = columns
        .iter()
        .map(|(column, ..)| column.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let entries = columns.iter().map(|(column, required, default, description)| {
        let default = match default {
            Some(value) => quote! { Some(#value) },
            None => quote! { None },
        };
        quote! {
            CsvColumn {
                name: #column,
                required: #required,
                default: #default,
                description: #description,
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn csv_columns() -> &'static [CsvColumn] {
                static COLUMNS: &[CsvColumn] = &[
                    #(#entries),*
                ];
                COLUMNS
            }

            pub fn csv_header() -> &'static str {
                #header
            }
        }
    };

    TokenStream::from(expanded)
}

/// Finds `#[<attr>(<key> = "...")]` among the attributes, ignoring unrelated keys.
fn string_arg(attrs: &[Attribute], attr: &str, key: &str) -> syn::Result<Option<String>> {
    let mut found = None;
    for a in attrs.iter().filter(|a| a.path().is_ident(attr)) {
        if !matches!(a.meta, Meta::List(_)) {
            continue;
        }
        a.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                let value: LitStr = meta.value()?.parse()?;
                found = Some(value.value());
            } else if meta.input.peek(syn::Token![=]) {
                // skip `other = <expr>`
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(found)
}

fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
