use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, Expr, Field, Fields, Ident, LitInt, Result, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
};

/// Base type names as written in attributes, with their `BaseType` variants.
const BASE_TYPES: [(&str, &str); 14] = [
    ("enum", "Enum"),
    ("sint8", "Sint8"),
    ("uint8", "Uint8"),
    ("sint16", "Sint16"),
    ("uint16", "Uint16"),
    ("sint32", "Sint32"),
    ("uint32", "Uint32"),
    ("string", "String"),
    ("float32", "Float32"),
    ("float64", "Float64"),
    ("uint8z", "Uint8z"),
    ("uint16z", "Uint16z"),
    ("uint32z", "Uint32z"),
    ("byte", "Byte"),
];

pub(crate) fn expand_message(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`Message` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`Message` may only be derived on structs with named fields.",
        ))?
    };

    let Some(attr) = input.attrs.iter().find(|a| a.path().is_ident("message")) else {
        Err(Error::new_spanned(
            &input.ident,
            "`Message` requires a `#[message(global = N, local = N)]` attribute.",
        ))?
    };

    let MessageAttribute { global, local } = attr.meta.require_list()?.parse_args()?;

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut numbers = HashSet::new();
    for field in &fields {
        if !numbers.insert(field.number.base10_parse::<u8>()?) {
            Err(Error::new_spanned(
                &field.number,
                "Field numbers must be unique.",
            ))?;
        }
    }

    let values = fields.iter().map(|field| {
        let FieldMetadata {
            name,
            number,
            base_type,
            scale,
        } = field;

        let scale = match scale {
            Some(scale) => quote! { ::core::option::Option::Some((#scale) as f64) },
            None => quote! { ::core::option::Option::None },
        };

        quote! {
            ::chainring::sans::data::FieldValue {
                number: #number,
                base_type: ::chainring::sans::data::BaseType::#base_type,
                value: ::chainring::avec::ToField::to_field(&self.#name),
                scale: #scale,
            }
        }
    });

    let count = fields.len();
    let name = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::chainring::avec::Message for #name #type_generics #where_clause {
            const GLOBAL: u16 = #global;
            const LOCAL: u8 = #local;

            fn fields(&self) -> ::chainring::__private::Vec<::chainring::sans::data::FieldValue> {
                let mut fields = ::chainring::__private::Vec::with_capacity(#count);
                #(fields.push(#values);)*
                fields
            }
        }
    };

    Ok(expanded)
}

#[derive(Debug)]
struct MessageAttribute {
    global: LitInt,
    local: LitInt,
}

impl Parse for MessageAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut global = None;
        let mut local = None;

        while !input.is_empty() {
            let key = input.parse::<Ident>()?;
            input.parse::<Token![=]>()?;
            let value = input.parse::<LitInt>()?;

            if key == "global" {
                value.base10_parse::<u16>()?;
                global = Some(value);
            } else if key == "local" {
                if value.base10_parse::<u8>()? >= 16 {
                    Err(Error::new_spanned(
                        &value,
                        "Local message types must be below 16.",
                    ))?;
                }
                local = Some(value);
            } else {
                Err(Error::new_spanned(key, "Expected `global` or `local`."))?;
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        let Some(global) = global else {
            Err(input.error("Missing `global` message number."))?
        };

        let Some(local) = local else {
            Err(input.error("Missing `local` message type."))?
        };

        Ok(Self { global, local })
    }
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    number: LitInt,
    base_type: Ident,
    scale: Option<Expr>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let Some(name) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let FieldAttribute {
            number,
            base_type,
            scale,
        } = attr.meta.require_list()?.parse_args()?;

        Ok(Some(Self {
            name,
            number,
            base_type,
            scale,
        }))
    }
}

#[derive(Debug)]
struct FieldAttribute {
    number: LitInt,
    base_type: Ident,
    scale: Option<Expr>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let number = input.parse::<LitInt>()?;
        input.parse::<Token![,]>()?;

        // `enum` is a keyword, so accept any identifier.
        let ident = input.call(Ident::parse_any)?;

        let Some((_, variant)) = BASE_TYPES.iter().find(|(name, _)| ident == *name) else {
            Err(Error::new_spanned(
                &ident,
                "Base type must be named as in the protocol document, such as `uint16`.",
            ))?
        };

        let base_type = format_ident!("{}", variant, span = ident.span());

        let scale = if !input.is_empty() {
            input.parse::<Token![,]>()?;

            let key = input.parse::<Ident>()?;
            if key != "scale" {
                Err(Error::new_spanned(key, "Expected `scale`."))?;
            }

            input.parse::<Token![=]>()?;
            Some(input.parse::<Expr>()?)
        } else {
            None
        };

        Ok(Self {
            number,
            base_type,
            scale,
        })
    }
}
