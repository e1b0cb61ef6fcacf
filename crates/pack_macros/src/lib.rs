//! Proc-macros for `pack_core`.

mod pack_type;

/// Derive `PackType` for a struct.
///
/// The struct is packed as a tuple of its fields, in declaration order. Its
/// type info is the tuple type info of the field types, so a derived record
/// and the equivalent tuple are interchangeable on the wire.
///
/// ```ignore
/// #[derive(PackType)]
/// struct Reading {
///     sensor: String,
///     samples: Vec<i16>,
/// }
///
/// // same type info as (String, Vec<i16>)
/// ```
///
/// Every field type must implement `PackType`. Enums, unions, unit structs
/// and structs with more than 255 fields are rejected.
#[proc_macro_derive(PackType)]
pub fn derive_pack_type(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(item as syn::DeriveInput);

    pack_type::derive(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
