#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! The only macro today is [`macro@trellis_error`], which turns a plain enum into the
//! error type used across the registry, the activation engine and the plugins.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for domain error enums.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, Source>` of every variant that wraps a `source` field.
/// * `From<Source>` for variants with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * `code(&self) -> &'static str`, the variant name in kebab case
///   (`UnknownFeatureType` becomes `"unknown-feature-type"`). Codes are stable and
///   used as lookup keys for localized messages.
/// * A module-private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Only enums are accepted.
/// 2. Every variant uses named fields; tuple and unit variants are rejected.
/// 3. A variant with a source must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[trellis_derive::trellis_error]
/// pub enum PluginError {
///     #[error("Kernel error{}: {source}", format_context(.context))]
///     Kernel { source: trellis_kernel::KernelError, context: Option<Cow<'static, str>> },
///
///     #[error("Internal plugin error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn install() -> Result<(), PluginError> {
///     register().context("Registering login addon")?;
///     Err("not ready".into())
/// }
/// ```
#[proc_macro_attribute]
pub fn trellis_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
