//! design! macro: parse markup-like syntax and generate code that builds a
//! trellis `Design`.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{Error, Ident, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// A parsed attribute: `name="value"` or a bare `name`.
#[derive(Debug, Clone)]
pub(crate) struct Attribute {
    pub name: String,
    pub value: String,
}

/// A parsed element: `<tag attrs... />` or `<tag attrs...> children </tag>`.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub tag: String,
    pub attrs: Vec<Attribute>,
    /// Concatenated string literal children.
    pub text: Option<String>,
    pub children: Vec<Element>,
}

/// The design! input: exactly one root element.
#[derive(Debug)]
struct DesignInput {
    root: Element,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for DesignInput {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::new(
                Span::call_site(),
                "design! macro requires a root element",
            ));
        }
        let root = parse_element(input)?;
        if !input.is_empty() {
            return Err(input.error("design! macro takes a single root element"));
        }
        Ok(DesignInput { root })
    }
}

/// Parse a hyphenated name: `vaadin-check-box`, `max-length`, `:expand`.
/// Keywords are accepted as name parts (`type`, `for`).
fn parse_name(input: ParseStream) -> Result<(String, Span)> {
    let mut name = String::new();
    if input.peek(Token![:]) {
        input.parse::<Token![:]>()?;
        name.push(':');
    }
    let first = Ident::parse_any(input)?;
    let span = first.span();
    name.push_str(&first.unraw().to_string());
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        let part = Ident::parse_any(input)?;
        name.push('-');
        name.push_str(&part.unraw().to_string());
    }
    Ok((name, span))
}

/// Parse a single element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    input.parse::<Token![<]>()?;
    let (tag, _) = parse_name(input)?;

    let mut attrs: Vec<Attribute> = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                text: None,
                children: Vec::new(),
            });
        }
        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let (name, span) = parse_name(input)?;
        let value = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            input.parse::<LitStr>()?.value()
        } else {
            String::new()
        };
        if attrs.iter().any(|attr| attr.name == name) {
            return Err(Error::new(span, format!("duplicate attribute `{name}`")));
        }
        attrs.push(Attribute { name, value });
    }

    let mut text: Option<String> = None;
    let mut children = Vec::new();
    loop {
        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let (closing, span) = parse_name(input)?;
            if closing != tag {
                return Err(Error::new(
                    span,
                    format!("mismatched closing tag: expected `</{tag}>`, found `</{closing}>`"),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }
        if input.peek(Token![<]) {
            children.push(parse_element(input)?);
        } else if input.peek(LitStr) {
            let literal: LitStr = input.parse()?;
            text.get_or_insert_with(String::new)
                .push_str(&literal.value());
        } else {
            return Err(input.error(
                "expected a child element, a string literal or `</` to close the parent",
            ));
        }
    }

    Ok(Element {
        tag,
        attrs,
        text,
        children,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// Emit one `let` per element, parents before children.
fn generate_element(
    elem: &Element,
    parent: Option<&Ident>,
    next: &mut usize,
    out: &mut Vec<TokenStream>,
) {
    let var = format_ident!("__e{}", *next);
    *next += 1;

    let tag = &elem.tag;
    let names = elem.attrs.iter().map(|attr| &attr.name);
    let values = elem.attrs.iter().map(|attr| &attr.value);
    let text = elem.text.as_ref().map(|text| quote! { .with_text(#text) });
    let data = quote! {
        ::trellis::design::ElementData::new(#tag)
            #(.with_attr(#names, #values))*
            #text
    };

    out.push(match parent {
        None => quote! {
            #[allow(unused_variables)]
            let #var = __design.insert(#data);
        },
        Some(parent) => quote! {
            #[allow(unused_variables)]
            let #var = __design.insert_child(#parent, #data);
        },
    });

    for child in &elem.children {
        generate_element(child, Some(&var), next, out);
    }
}

/// Entry point: generate code for the whole design! macro.
pub(crate) fn design_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: DesignInput = syn::parse2(input)?;

    let mut statements = Vec::new();
    let mut next = 0;
    generate_element(&parsed.root, None, &mut next, &mut statements);

    Ok(quote! {
        {
            let mut __design = ::trellis::design::Design::new();
            #(#statements)*
            __design
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================
