//! Derive macros for rosecheck property-based testing.
//!
//! This crate provides `#[derive(Arbitrary)]`, which builds a generator for
//! a custom type out of the generators of its fields.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericParam, Ident};

/// Derive macro implementing `rosecheck::Arbitrary`.
///
/// Every field is picked from `<FieldType as Arbitrary>::arbitrary()`, so
/// each field is recorded and shrunk on its own. Enum variants are chosen by
/// picking an index, which shrinks toward the first variant.
///
/// The type must also implement `Clone` and `Debug`.
///
/// # Example
///
/// ```rust,ignore
/// use rosecheck::*;
///
/// #[derive(Arbitrary, Debug, Clone, PartialEq)]
/// struct User {
///     name: String,
///     age: u32,
///     admin: bool,
/// }
///
/// let user_gen = User::arbitrary();
/// ```
#[proc_macro_derive(Arbitrary)]
pub fn derive_arbitrary(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match arbitrary_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the implementation for the Arbitrary trait.
fn arbitrary_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!(::rosecheck::Arbitrary));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let generator_impl = match &input.data {
        Data::Struct(data) => struct_generator(&data.fields)?,
        Data::Enum(data) => enum_generator(input, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Arbitrary derive macro does not support unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::rosecheck::Arbitrary for #name #ty_generics #where_clause {
            fn arbitrary() -> ::rosecheck::Gen<Self> {
                #generator_impl
            }
        }
    })
}

/// Field generators bound to fresh variables, and the expression building
/// the value from picks of those generators.
struct Construction {
    bindings: TokenStream2,
    value: TokenStream2,
}

fn construct(fields: &Fields, path: TokenStream2, prefix: &str) -> Construction {
    let vars: Vec<Ident> = (0..fields.len())
        .map(|i| Ident::new(&format!("{prefix}field_{i}"), Span::call_site()))
        .collect();
    let bindings = fields.iter().zip(&vars).map(|(field, var)| {
        let ty = &field.ty;
        quote! {
            let #var = <#ty as ::rosecheck::Arbitrary>::arbitrary();
        }
    });
    let bindings = quote! { #(#bindings)* };

    let value = match fields {
        Fields::Named(named) => {
            let names = named.named.iter().map(|field| &field.ident);
            quote! { #path { #(#names: #vars.pick()?),* } }
        }
        Fields::Unnamed(_) => quote! { #path(#(#vars.pick()?),*) },
        Fields::Unit => path,
    };

    Construction { bindings, value }
}

/// Generate implementation for structs.
fn struct_generator(fields: &Fields) -> Result<TokenStream2, syn::Error> {
    let Construction { bindings, value } = construct(fields, quote! { Self }, "");

    Ok(quote! {
        #bindings
        ::rosecheck::Gen::new(move || Ok(#value))
    })
}

/// Generate implementation for enums.
fn enum_generator(input: &DeriveInput, data: &syn::DataEnum) -> Result<TokenStream2, syn::Error> {
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "Arbitrary derive macro needs at least one enum variant",
        ));
    }

    let last = data.variants.len() - 1;
    let mut bindings = Vec::new();
    let mut arms = Vec::new();
    for (index, variant) in data.variants.iter().enumerate() {
        let variant_name = &variant.ident;
        let construction = construct(
            &variant.fields,
            quote! { Self::#variant_name },
            &format!("variant_{index}_"),
        );
        bindings.push(construction.bindings);

        let value = construction.value;
        if index == last {
            arms.push(quote! { _ => #value });
        } else {
            arms.push(quote! { #index => #value });
        }
    }

    Ok(quote! {
        #(#bindings)*
        let variant = ::rosecheck::Gen::<usize>::range(0, #last);
        ::rosecheck::Gen::new(move || {
            Ok(match variant.pick()? {
                #(#arms,)*
            })
        })
    })
}
