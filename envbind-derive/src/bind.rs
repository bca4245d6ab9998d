//! Implementation of #[derive(Bind)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    ext::IdentExt, parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields,
    GenericParam, Ident, Type,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Expand,
    Flatten,
    Skip,
    NoExpand,
}

struct BoundField<'a> {
    ident: &'a Ident,
    name: String,
    ty: &'a Type,
    mode: Mode,
}

pub fn derive_bind_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields
                .named
                .iter()
                .map(parse_field)
                .collect::<syn::Result<Vec<_>>>()?,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Bind requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Bind only works on structs",
            ))
        }
    };

    // every type parameter ends up walked or assigned
    let mut generics = input.generics.clone();
    for param in generics.params.iter_mut() {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!(::envbind::Bind));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let discover = fields.iter().filter_map(|field| {
        let BoundField { name, ty, .. } = field;

        let method = match field.mode {
            Mode::Expand => quote!(field),
            Mode::Flatten => quote!(flatten),
            Mode::NoExpand => quote!(opaque),
            Mode::Skip => return None,
        };

        Some(quote! {
            walker.#method::<Self, #ty>(#name, path)?;
        })
    });

    let assign_named = fields.iter().filter_map(|field| {
        let BoundField { ident, name, .. } = field;

        match field.mode {
            Mode::Expand => Some(quote! {
                if head == #name {
                    return ::envbind::Bind::assign(&mut self.#ident, writer, rest, raw);
                }
            }),
            Mode::NoExpand => Some(quote! {
                if head == #name {
                    return ::envbind::Bind::assign_opaque(&mut self.#ident, writer, raw);
                }
            }),
            Mode::Flatten | Mode::Skip => None,
        }
    });

    // flattened records are tried once own fields didn't match
    let assign_flattened = fields
        .iter()
        .filter(|field| field.mode == Mode::Flatten)
        .map(|BoundField { ident, ty, .. }| {
            quote! {
                if <#ty as ::envbind::Record>::has_field(head) {
                    return ::envbind::Bind::assign(&mut self.#ident, writer, path, raw);
                }
            }
        });

    let has_field = fields.iter().filter_map(|field| {
        let BoundField { name, ty, .. } = field;

        match field.mode {
            Mode::Expand | Mode::NoExpand => Some(quote!(|| name == #name)),
            Mode::Flatten => Some(quote!(|| <#ty as ::envbind::Record>::has_field(name))),
            Mode::Skip => None,
        }
    });

    Ok(quote! {
        impl #impl_generics ::envbind::Bind for #name #ty_generics #where_clause {
            fn discover(
                walker: &mut ::envbind::Walker<'_>,
                path: &mut ::envbind::Path,
            ) -> ::std::result::Result<(), ::envbind::Error> {
                #(#discover)*
                ::std::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                writer: &::envbind::Writer<'_>,
                path: &[::envbind::Segment],
                raw: &str,
            ) -> ::std::result::Result<(), ::envbind::Error> {
                let (head, rest) = writer.split_field::<Self>(path)?;

                #(#assign_named)*
                #(#assign_flattened)*

                ::std::result::Result::Err(::envbind::Error::UnknownField {
                    field: ::std::string::String::from(head),
                    ty: ::std::any::type_name::<Self>(),
                })
            }
        }

        impl #impl_generics ::envbind::Record for #name #ty_generics #where_clause {
            fn has_field(name: &str) -> bool {
                false #(#has_field)*
            }
        }
    })
}

fn parse_field(field: &Field) -> syn::Result<BoundField<'_>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "Bind requires named fields"))?;

    Ok(BoundField {
        ident,
        name: ident.unraw().to_string(),
        ty: &field.ty,
        mode: parse_mode(field)?,
    })
}

fn parse_mode(field: &Field) -> syn::Result<Mode> {
    let mut mode = Mode::Expand;

    for attr in &field.attrs {
        if !attr.path().is_ident("envbind") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let next = if meta.path.is_ident("flatten") {
                Mode::Flatten
            } else if meta.path.is_ident("skip") {
                Mode::Skip
            } else if meta.path.is_ident("noexpand") {
                Mode::NoExpand
            } else {
                return Err(meta.error("expected one of `flatten`, `skip`, `noexpand`"));
            };

            if mode != Mode::Expand && mode != next {
                return Err(meta.error("`flatten`, `skip` and `noexpand` are exclusive"));
            }

            mode = next;
            Ok(())
        })?;
    }

    Ok(mode)
}
