//! Small helpers for parsing and naming `syn` types.

use proc_macro2::Span;

pub(crate) fn parse_str_as_ident(lit: &str) -> syn::Ident {
    syn::Ident::new(lit, Span::call_site())
}

/// Constructs an error pointing at `tokens`.
pub(crate) fn spanned_err(tokens: &dyn quote::ToTokens, display: &dyn std::fmt::Display) -> syn::Error {
    syn::Error::new_spanned(tokens, display)
}
