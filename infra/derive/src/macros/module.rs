use super::attrs::derived_traits;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, Ident, ItemStruct, Meta, Token};

struct ModuleArgs {
    environments: Vec<Ident>,
    factory: Option<Expr>,
}

fn parse_args(args: TokenStream) -> syn::Result<ModuleArgs> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args.clone())?;

    let mut environments = Vec::new();
    let mut factory = None;
    for meta in metas {
        match meta {
            Meta::Path(path) => {
                let ident = path.get_ident().cloned().ok_or_else(|| {
                    syn::Error::new_spanned(&path, "expected an environment name such as `Prod`")
                })?;
                environments.push(ident);
            },
            Meta::NameValue(nv) if nv.path.is_ident("factory") => {
                if factory.replace(nv.value).is_some() {
                    return Err(syn::Error::new_spanned(nv.path, "duplicate `factory` argument"));
                }
            },
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected environment names and an optional `factory = path`",
                ));
            },
        }
    }

    if environments.is_empty() {
        return Err(syn::Error::new_spanned(
            args,
            "modwire_module requires at least one environment, e.g. #[modwire_module(All)]",
        ));
    }

    Ok(ModuleArgs { environments, factory })
}

pub fn expand_module(args: TokenStream, input: ItemStruct) -> TokenStream {
    let args = match parse_args(args) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error(),
    };
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "modwire_module does not support generics")
            .to_compile_error();
    }

    let ident = &input.ident;
    let derived = derived_traits(&input.attrs);
    let debug_derive = if derived.contains("Debug") {
        quote! {}
    } else {
        quote! { #[derive(Debug)] }
    };

    let environments = args.environments.iter().map(|env| quote! { ::modwire_inject::Environment::#env });
    let factory_fn = format_ident!("__modwire_factory_{}", ident);
    let construct = args.factory.map_or_else(
        || {
            quote! {
                ::core::result::Result::Ok(::std::boxed::Box::new(
                    <#ident as ::core::default::Default>::default(),
                ))
            }
        },
        |factory| {
            quote! {
                let module: #ident = (#factory)()?;
                ::core::result::Result::Ok(::std::boxed::Box::new(module))
            }
        },
    );

    quote! {
        #debug_derive
        #input

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #factory_fn() -> ::core::result::Result<
            ::std::boxed::Box<dyn ::modwire_inject::Module>,
            ::modwire_inject::InjectError,
        > {
            #construct
        }

        impl #ident {
            /// Registration descriptor generated by `#[modwire_module]`.
            pub const DESCRIPTOR: ::modwire_inject::ModuleDescriptor =
                ::modwire_inject::ModuleDescriptor::new(
                    concat!(module_path!(), "::", stringify!(#ident)),
                    &[#(#environments),*],
                    #factory_fn,
                );
        }

        impl ::modwire_inject::Module for #ident {
            fn name(&self) -> &'static str {
                Self::DESCRIPTOR.name()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    }
}
