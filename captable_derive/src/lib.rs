/*!
An implementation detail of captable.
*/

extern crate proc_macro;

use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;

mod declaration;
mod generate;
mod parse_utils;

/// This macro is documented in the `captable` crate.
#[proc_macro]
pub fn capability(input: TokenStream1) -> TokenStream1 {
    parse_or_compile_err(input, generate::capability_impl).into()
}

fn parse_or_compile_err<P, F>(input: TokenStream1, f: F) -> TokenStream2
where
    P: syn::parse::Parse,
    F: FnOnce(P) -> Result<TokenStream2, syn::Error>,
{
    syn::parse::<P>(input)
        .and_then(f)
        .unwrap_or_else(|e| e.to_compile_error())
}
