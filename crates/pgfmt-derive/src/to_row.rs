//! `#[derive(ToRow)]`: build a `pgfmt::Object` data row from a struct.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "ToRow can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "ToRow can only be derived for structs",
            ));
        }
    };

    let rename_all = parse_rename_all(&input)?;

    let mut inserts = Vec::new();
    for field in fields {
        let attr = parse_field_attr(field)?;
        if attr.skip {
            continue;
        }

        let Some(field_ident) = &field.ident else {
            continue;
        };
        let key = match attr.rename {
            Some(key) => key,
            None => {
                let raw = field_ident.to_string();
                let raw = raw.strip_prefix("r#").unwrap_or(&raw);
                match rename_all {
                    Some(rule) => rule.apply(raw),
                    None => raw.to_string(),
                }
            }
        };

        inserts.push(quote! {
            row.insert(
                ::std::string::String::from(#key),
                ::pgfmt::Value::from(::core::clone::Clone::clone(&self.#field_ident)),
            );
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::pgfmt::ToRow for #name #ty_generics #where_clause {
            fn to_row(&self) -> ::pgfmt::Object {
                let mut row = ::pgfmt::Object::new();
                #(#inserts)*
                row
            }
        }
    })
}

#[derive(Clone, Copy)]
enum RenameRule {
    Snake,
    Camel,
    Pascal,
    Kebab,
    ScreamingSnake,
    Lower,
    Upper,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Result<Self> {
        Ok(match lit.value().as_str() {
            "snake_case" => RenameRule::Snake,
            "camelCase" => RenameRule::Camel,
            "PascalCase" => RenameRule::Pascal,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            other => {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("unknown rename_all rule \"{other}\""),
                ));
            }
        })
    }

    fn apply(self, name: &str) -> String {
        match self {
            RenameRule::Snake => name.to_snake_case(),
            RenameRule::Camel => name.to_lower_camel_case(),
            RenameRule::Pascal => name.to_upper_camel_case(),
            RenameRule::Kebab => name.to_kebab_case(),
            RenameRule::ScreamingSnake => name.to_shouty_snake_case(),
            RenameRule::Lower => name.to_lowercase(),
            RenameRule::Upper => name.to_uppercase(),
        }
    }
}

/// Parse struct-level `#[pgfmt(rename_all = "...")]`.
fn parse_rename_all(input: &DeriveInput) -> Result<Option<RenameRule>> {
    let mut rule = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("pgfmt") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                rule = Some(RenameRule::parse(&lit)?);
                Ok(())
            } else {
                Err(meta.error("unsupported pgfmt attribute, expected `rename_all`"))
            }
        })?;
    }
    Ok(rule)
}

#[derive(Default)]
struct FieldAttr {
    rename: Option<String>,
    skip: bool,
}

/// Parse field-level `#[pgfmt(rename = "...")]` and `#[pgfmt(skip)]`.
fn parse_field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut out = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("pgfmt") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new_spanned(&lit, "rename must not be empty"));
                }
                out.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported pgfmt attribute, expected `rename` or `skip`"))
            }
        })?;
    }
    Ok(out)
}
