#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the module wiring workspace.
//! This crate provides attribute macros that remove the boilerplate around
//! error enums and module registration descriptors.
//!
//! ## Usage
//! Depend on the crate from workspace members:
//! ```toml
//! [dependencies]
//! modwire-derive = { path = "../infra/derive" }
//! ```
//!
//! The examples below are `ignore`d to avoid compiling in this crate; the
//! consuming crates exercise them in their own tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source`
///   field (or a field marked `#[source]`/`#[from]`), enabling `?` on upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` if an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Every variant uses named fields.
/// 3. Variants with a source must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use modwire_derive::modwire_error;
/// use std::borrow::Cow;
///
/// #[modwire_error]
/// pub enum ScanError {
///     #[error("Invalid scope pattern{}: {source}", format_context(.context))]
///     Pattern { source: regex::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal scan error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn compile(scope: &str) -> Result<regex::Regex, ScanError> {
///     regex::Regex::new(scope).context("Compiling scope")
/// }
/// ```
#[proc_macro_attribute]
pub fn modwire_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro declaring a wiring module and the tiers it applies to.
///
/// Generates:
/// 1. A `DESCRIPTOR` associated constant (`modwire_inject::ModuleDescriptor`) carrying the
///    fully-qualified type name, the declared environments, and a factory function.
/// 2. An implementation of `modwire_inject::Module`.
/// 3. `#[derive(Debug)]` unless already derived.
///
/// The factory uses `Default` unless `factory = path` names a
/// `fn() -> Result<Self, InjectError>`.
///
/// # Example
/// ```rust,ignore
/// use modwire_inject::{ModuleRegistry, modwire_module};
///
/// #[modwire_module(Prod, Test)]
/// #[derive(Default)]
/// pub struct MetricsModule;
///
/// let registry = ModuleRegistry::builder().register(MetricsModule::DESCRIPTOR).build();
/// ```
#[proc_macro_attribute]
pub fn modwire_module(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::module::expand_module(args.into(), input).into()
}
