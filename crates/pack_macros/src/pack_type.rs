//! This module derives a `PackType` impl for a struct.
//!
//! Fields map onto the components of a tuple: the type info groups the field
//! type infos, and the payload is each field's payload back to back.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Fields};

/// Largest component count a tuple type info can hold
const MAX_FIELDS: usize = u8::MAX as usize;

/// Construct the impl
pub fn derive(input: DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(e) => {
            return Err(syn::Error::new(
                e.enum_token.span,
                "PackType can only be derived for structs",
            ))
        }
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span,
                "PackType can only be derived for structs",
            ))
        }
    };

    if fields.is_empty() {
        return Err(syn::Error::new(
            input.span(),
            "a record needs at least one field, use `pack_core::Unit` for empty values",
        ));
    }

    if fields.len() > MAX_FIELDS {
        return Err(syn::Error::new(
            fields.span(),
            format!("at most {} fields fit a type info", MAX_FIELDS),
        ));
    }

    let field_types = fields.iter().map(|f| &f.ty).collect::<Vec<_>>();

    // `self.name` or `self.0`, in declaration order
    let accessors = fields
        .iter()
        .enumerate()
        .map(|(idx, f)| match &f.ident {
            Some(name) => quote! { #name },
            None => {
                let idx = syn::Index::from(idx);
                quote! { #idx }
            }
        })
        .collect::<Vec<_>>();

    let construct = match fields {
        Fields::Named(_) => quote! {
            Self {
                #(#accessors: <#field_types as ::pack_core::PackType>::unpack_value(unpacker)?,)*
            }
        },
        _ => quote! {
            Self(
                #(<#field_types as ::pack_core::PackType>::unpack_value(unpacker)?,)*
            )
        },
    };

    // every field type must be packable, which covers generic parameters
    let mut generics = input.generics.clone();
    let where_clause = generics.make_where_clause();
    for ty in &field_types {
        where_clause
            .predicates
            .push(syn::parse_quote! { #ty: ::pack_core::PackType });
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::pack_core::PackType for #ident #ty_generics #where_clause {
            fn type_info() -> ::pack_core::TypeInfo {
                ::pack_core::TypeInfo::group(
                    ::pack_core::TypeId::Tuple,
                    &[#(<#field_types as ::pack_core::PackType>::type_info()),*],
                )
            }

            fn pack_value(&self, packer: &mut ::pack_core::Packer) -> ::pack_core::PackResult<()> {
                #(::pack_core::PackType::pack_value(&self.#accessors, packer)?;)*
                Ok(())
            }

            fn unpack_value(
                unpacker: &mut ::pack_core::Unpacker<'_>,
            ) -> ::pack_core::PackResult<Self> {
                Ok(#construct)
            }
        }
    })
}
