use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Token, Variant};

struct Mapping {
    pattern: TokenStream,
    status: TokenStream,
    message: TokenStream,
}

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "HttpError can only be derived for enums",
        ));
    };

    let mappings = data
        .variants
        .iter()
        .map(variant_mapping)
        .collect::<syn::Result<Vec<_>>>()?;

    let code_arms = mappings.iter().map(|m| {
        let (pattern, status) = (&m.pattern, &m.status);
        quote! { #pattern => #status, }
    });
    let message_arms = mappings.iter().map(|m| {
        let (pattern, message) = (&m.pattern, &m.message);
        quote! {
            #[allow(unused_variables)]
            #pattern => #message,
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            pub fn http_code(&self) -> http::StatusCode {
                match self {
                    #(#code_arms)*
                }
            }

            pub fn http_message(&self) -> String {
                match self {
                    #(#message_arms)*
                }
            }
        }
    })
}

fn variant_mapping(variant: &Variant) -> syn::Result<Mapping> {
    let attr = variant
        .attrs
        .iter()
        .find(|a| a.path().is_ident("http_error"))
        .ok_or_else(|| {
            syn::Error::new(
                variant.ident.span(),
                "missing #[http_error(STATUS[, \"message\"])] on variant",
            )
        })?;
    let (status, message) = parse_attr(attr)?;

    let ident = &variant.ident;
    let pattern = match &variant.fields {
        Fields::Unit => quote! { Self::#ident },
        Fields::Unnamed(fields) => {
            let names = (0..fields.unnamed.len()).map(positional);
            quote! { Self::#ident(#(#names),*) }
        }
        Fields::Named(fields) => {
            let names = fields.named.iter().filter_map(|f| f.ident.as_ref());
            quote! { Self::#ident { #(#names),* } }
        }
    };

    let message = match message {
        Some(msg) if matches!(variant.fields, Fields::Unit) => quote! { #msg.to_string() },
        Some(msg) => {
            let msg = positional_placeholders(&msg);
            quote! { format!(#msg) }
        }
        None => quote! { self.to_string() },
    };

    Ok(Mapping {
        pattern,
        status,
        message,
    })
}

fn parse_attr(attr: &Attribute) -> syn::Result<(TokenStream, Option<String>)> {
    let args = attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
    let mut args = args.into_iter();

    let status = match args.next() {
        Some(Expr::Path(path)) => {
            let code = &path.path;
            quote! { http::StatusCode::#code }
        }
        Some(Expr::Lit(lit)) => match &lit.lit {
            Lit::Int(int) => {
                let code = int.base10_parse::<u16>()?;
                if !(100..1000).contains(&code) {
                    return Err(syn::Error::new(int.span(), "status code must be 100..=999"));
                }
                quote! {
                    match http::StatusCode::from_u16(#code) {
                        Ok(code) => code,
                        Err(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
                    }
                }
            }
            other => return Err(syn::Error::new(other.span(), "expected a status code")),
        },
        Some(other) => return Err(syn::Error::new(other.span(), "expected a status code")),
        None => return Err(syn::Error::new(attr.span(), "expected a status code")),
    };

    let message = match args.next() {
        Some(Expr::Lit(lit)) => match &lit.lit {
            Lit::Str(s) => Some(s.value()),
            other => return Err(syn::Error::new(other.span(), "expected a string message")),
        },
        Some(other) => return Err(syn::Error::new(other.span(), "expected a string message")),
        None => None,
    };

    Ok((status, message))
}

fn positional(index: usize) -> Ident {
    Ident::new(&format!("__self_{index}"), Span::call_site())
}

/// Rewrites `{0}` style placeholders to the bindings produced by [`positional`].
/// Escaped `{{` is copied through untouched.
fn positional_placeholders(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if c != '{' {
            continue;
        }
        match chars.peek() {
            Some('{') => {
                out.push('{');
                chars.next();
            }
            Some(d) if d.is_ascii_digit() => out.push_str("__self_"),
            _ => {}
        }
    }

    out
}
