//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates implementations of the `Record` and `ToValue`
//! traits and field name constants for use with `seqwise::field`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Result};

use super::attrs::parse_record_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_entries: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let record_attrs = parse_record_attrs(&field.attrs)?;
        if record_attrs.skip {
            continue;
        }

        let record_name = record_attrs
            .rename
            .unwrap_or_else(|| field_name.to_string());

        // Generate constant name (SCREAMING_SNAKE_CASE)
        let const_name = syn::parse_str::<Ident>(&to_screaming_snake_case(&record_name))
            .map_err(|_| {
                Error::new(
                    field.span(),
                    format!("record name \"{record_name}\" does not form a valid constant name"),
                )
            })?;

        field_constants.push(quote! {
            /// Field name constant for key selectors.
            pub const #const_name: &'static str = #record_name;
        });

        let value_expr = quote! {
            ::seqwise::Value::from(::core::clone::Clone::clone(&self.#field_name))
        };

        field_matches.push(quote! {
            #record_name => #value_expr,
        });
        field_entries.push(quote! {
            (::std::string::String::from(#record_name), #value_expr),
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::seqwise::Record for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::seqwise::Value {
                match field {
                    #(#field_matches)*
                    _ => ::seqwise::Value::Null,
                }
            }
        }

        impl #impl_generics ::seqwise::ToValue for #struct_name #ty_generics #where_clause {
            fn to_value(&self) -> ::seqwise::Value {
                ::seqwise::Value::Map(::std::vec![
                    #(#field_entries)*
                ])
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == ' ' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}
