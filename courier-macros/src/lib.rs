//! Derive macros for courier.

extern crate proc_macro;

mod http_error;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro mapping error variants to an HTTP status and a public message
///
/// Every variant carries `#[http_error(...)]` with one or two arguments
/// - status code (required)
/// - public message (optional)
///
/// ### Status Code
///
/// Either a `StatusCode` constant (e.g. `BAD_REQUEST`) or a number (e.g. `400`).
/// Returned by `http_code()`.
///
/// ### Public Message
///
/// A string literal with basic interpolation:
/// - tuple variants interpolate by index: `"bad field {0}"`
/// - struct variants interpolate by field name: `"field {name} is invalid"`
///
/// Without a message the `Display` implementation is used, so the usual
/// `thiserror` message doubles as the public one. Give an explicit message when
/// the internal error text should not reach the client.
///
/// Returned by `http_message()`.
///
/// ### Example
///
/// ```rust,ignore
/// #[derive(Debug, thiserror::Error, courier::HttpError)]
/// enum ApiError {
///     #[error("invalid query: {0}")]
///     #[http_error(BAD_REQUEST)]
///     Query(String),
///
///     #[error("mail is disabled")]
///     #[http_error(404, "not found")]
///     MailDisabled,
///
///     #[error("internal error: {0:?}")]
///     #[http_error(INTERNAL_SERVER_ERROR, "an internal server error occurred")]
///     Anyhow(#[from] anyhow::Error),
/// }
/// ```
#[proc_macro_derive(HttpError, attributes(http_error))]
pub fn http_error_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    http_error::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
