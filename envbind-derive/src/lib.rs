//! Procedural macros for envbind
//!
//! This crate provides `#[derive(Bind)]`, implementing `envbind::Bind` and
//! `envbind::Record` for structs with named fields.

use proc_macro::TokenStream;

mod bind;

/// Derive macro binding a struct to environment variables.
///
/// Every field is bound under its own name, its type must implement
/// `envbind::Bind`.
///
/// # Attributes
///
/// - `#[envbind(flatten)]` - fields of the inner record are bound as if they
///   were declared in the outer one
/// - `#[envbind(skip)]` - the field is never read nor written, its type
///   doesn't need to implement `Bind`
/// - `#[envbind(noexpand)]` - the field is read from a single variable and
///   converted as a whole, even when it's a struct or a collection
///
/// # Example
///
/// ```ignore
/// #[derive(Default, Bind)]
/// pub struct Config {
///     #[envbind(flatten)]
///     server: ServerConfig,
///     #[envbind(noexpand)]
///     tags: Vec<String>,
/// }
/// ```
#[proc_macro_derive(Bind, attributes(envbind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    bind::derive_bind_impl(input)
}
