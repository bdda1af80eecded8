use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, Generics, Ident, LitStr,
    Token, Type,
};

/// Derive macro that implements `mox::FormBind` for a struct with named
/// fields, listing every field in declaration order for the form binder.
///
/// # Usage
///
/// ```ignore
/// use mox::{FormBind, Opt};
///
/// #[derive(Default, FormBind)]
/// #[form(rename_all = "camelCase")]
/// struct Filter {
///     user_name: String,          // bound from "userName"
///     #[form(rename = "p")]
///     page: Opt<u32>,             // bound from "p"
///     #[form("tag,omitempty")]
///     tags: Vec<String>,          // bound from "tag"
///     #[form(skip)]
///     cache: Vec<u8>,             // never bound
/// }
/// ```
///
/// The external name is, in order of priority: `#[form(rename = "...")]` or
/// the first non-blank segment of `#[form("...")]`, then the struct's
/// `rename_all` convention, then the Rust field name. `#[form(skip)]` and
/// `#[form("-")]` leave the field out.
///
/// Supported rename_all conventions: `camelCase`, `PascalCase`, `snake_case`,
/// `SCREAMING_SNAKE_CASE`, `kebab-case`, `SCREAMING-KEBAB-CASE`.
///
/// The derived struct itself cannot be used as a field of another bound
/// struct; binding such a field reports an unsupported kind. On enums the
/// derive compiles, but binding reports that only structs can be bound.
#[proc_macro_derive(FormBind, attributes(form))]
pub fn derive_form_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_form_bind(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_form_bind(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let rename_all = struct_rename_all(&input.attrs)?;

    let mut bound_types = Vec::new();
    let (body, kind) = match &input.data {
        Data::Struct(data) => {
            let mut slots = Vec::new();
            match &data.fields {
                Fields::Named(fields) => {
                    for field in &fields.named {
                        if let Some(slot) = field_slot(field, rename_all.as_ref())? {
                            slots.push(slot);
                            bound_types.push(&field.ty);
                        }
                    }
                }
                Fields::Unit => {}
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new_spanned(
                        name,
                        "FormBind can only be derived for structs with named fields",
                    ))
                }
            };
            let body = quote! {
                ::std::result::Result::Ok(::std::vec![ #( #slots ),* ])
            };
            (body, "struct")
        }
        Data::Enum(_) => (not_a_struct("enum"), "enum"),
        Data::Union(_) => (not_a_struct("union"), "union"),
    };

    let bind_generics = with_bounds(&input.generics, &bound_types, quote!(::mox::FormField));
    let bind_where = &bind_generics.where_clause;

    Ok(quote! {
        impl #impl_generics ::mox::FormBind for #name #ty_generics #bind_where {
            fn form_fields(
                &mut self,
            ) -> ::std::result::Result<
                ::std::vec::Vec<::mox::FieldSlot<'_>>,
                ::mox::BindError,
            > {
                #body
            }
        }

        impl #impl_generics ::mox::FormField for #name #ty_generics #where_clause {
            fn kind(&self) -> ::mox::FieldKind {
                ::mox::FieldKind::Unsupported(#kind)
            }

            fn set_form_values(
                &mut self,
                _: &[::std::string::String],
            ) -> ::std::result::Result<(), ::mox::BindError> {
                ::std::result::Result::Err(::mox::BindError::UnsupportedKind {
                    field: ::std::string::String::new(),
                    kind: #kind,
                })
            }
        }

        impl #impl_generics ::mox::OptionValue for #name #ty_generics #where_clause {
            const KIND: ::mox::OptKind = ::mox::OptKind::Unsupported(#kind);

            fn from_form_values(
                _: &[::std::string::String],
            ) -> ::std::result::Result<Self, ::mox::BindError> {
                ::std::result::Result::Err(::mox::BindError::UnsupportedOptionKind {
                    field: ::std::string::String::new(),
                    kind: #kind,
                })
            }
        }
    })
}

/// Copy of `generics` with `ty: bound` added for every field type, when the
/// struct has type parameters.
fn with_bounds(generics: &Generics, types: &[&Type], bound: TokenStream2) -> Generics {
    let mut generics = generics.clone();
    if generics.type_params().next().is_none() {
        return generics;
    }
    let where_clause = generics.make_where_clause();
    for ty in types {
        where_clause.predicates.push(parse_quote!(#ty: #bound));
    }
    generics
}

fn not_a_struct(kind: &str) -> TokenStream2 {
    quote! {
        ::std::result::Result::Err(::mox::BindError::NotAStruct { kind: #kind })
    }
}

/// `FieldSlot` constructor for one field, or `None` when it is skipped.
fn field_slot(field: &syn::Field, rename_all: Option<&String>) -> syn::Result<Option<TokenStream2>> {
    let Some(ident) = field.ident.as_ref() else {
        return Ok(None);
    };
    let ident_str = ident.to_string();
    let ident_str = ident_str.strip_prefix("r#").unwrap_or(&ident_str).to_string();

    let mut external = None;
    for arg in form_args(&field.attrs)? {
        match arg {
            FormArg::Skip(_) => return Ok(None),
            FormArg::Tag(lit) => {
                let tag = lit.value();
                if tag.trim() == "-" {
                    return Ok(None);
                }
                if let Some(first) = tag.split(',').map(str::trim).find(|s| !s.is_empty()) {
                    external = Some(first.to_string());
                }
            }
            FormArg::Rename(lit) => external = Some(lit.value()),
            FormArg::RenameAll(lit) => {
                return Err(syn::Error::new(
                    lit.span(),
                    "`rename_all` belongs on the struct, not on a field",
                ))
            }
        }
    }

    let external = external.unwrap_or_else(|| match rename_all {
        Some(convention) => rename_field(&ident_str, convention),
        None => ident_str.clone(),
    });

    Ok(Some(quote! {
        ::mox::FieldSlot::new(#external, #ident_str, &mut self.#ident)
    }))
}

// ---------------------------------------------------------------------------
// Attribute parsing helpers
// ---------------------------------------------------------------------------

enum FormArg {
    /// `#[form("name,opts")]`
    Tag(LitStr),
    /// `#[form(rename = "name")]`
    Rename(LitStr),
    /// `#[form(rename_all = "camelCase")]`
    RenameAll(LitStr),
    /// `#[form(skip)]`
    Skip(Ident),
}

impl Parse for FormArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(FormArg::Tag(input.parse()?));
        }
        let key: Ident = input.parse()?;
        if key == "skip" {
            return Ok(FormArg::Skip(key));
        }
        if key == "rename" || key == "rename_all" {
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;
            return Ok(if key == "rename" {
                FormArg::Rename(value)
            } else {
                FormArg::RenameAll(value)
            });
        }
        Err(syn::Error::new(
            key.span(),
            format!("unknown form attribute `{key}`"),
        ))
    }
}

fn form_args(attrs: &[Attribute]) -> syn::Result<Vec<FormArg>> {
    let mut args = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        let nested =
            attr.parse_args_with(Punctuated::<FormArg, Token![,]>::parse_terminated)?;
        args.extend(nested);
    }
    Ok(args)
}

/// Extract `#[form(rename_all = "...")]` from struct-level attributes.
fn struct_rename_all(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename_all = None;
    for arg in form_args(attrs)? {
        match arg {
            FormArg::RenameAll(lit) => {
                let convention = lit.value();
                if !CONVENTIONS.contains(&convention.as_str()) {
                    return Err(syn::Error::new(
                        lit.span(),
                        format!("unknown rename_all convention `{convention}`"),
                    ));
                }
                rename_all = Some(convention);
            }
            FormArg::Tag(lit) | FormArg::Rename(lit) => {
                return Err(syn::Error::new(
                    lit.span(),
                    "only `rename_all` is allowed on the struct",
                ))
            }
            FormArg::Skip(key) => {
                return Err(syn::Error::new(
                    key.span(),
                    "only `rename_all` is allowed on the struct",
                ))
            }
        }
    }
    Ok(rename_all)
}

const CONVENTIONS: &[&str] = &[
    "camelCase",
    "PascalCase",
    "snake_case",
    "SCREAMING_SNAKE_CASE",
    "kebab-case",
    "SCREAMING-KEBAB-CASE",
];

/// Convert a snake_case field name to the given naming convention.
fn rename_field(name: &str, convention: &str) -> String {
    match convention {
        "camelCase" => to_camel_case(name),
        "PascalCase" => to_pascal_case(name),
        "SCREAMING_SNAKE_CASE" => name.to_uppercase(),
        "kebab-case" => name.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => name.replace('_', "-").to_uppercase(),
        _ => name.to_string(),
    }
}

fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => pascal,
    }
}

fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;
    for ch in s.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}
