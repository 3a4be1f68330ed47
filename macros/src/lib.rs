//! Proc macros for trellis: `design!` markup composition.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `trellis`.

use proc_macro::TokenStream;

mod design_macro;

/// Markup-style design composition macro.
///
/// Builds a `trellis::design::Design` from element syntax.
///
/// # Syntax
///
/// - `<tag />`: self-closing element
/// - `<tag attr="val"> ... </tag>`: element with children
/// - Tag and attribute names may contain dashes (`vaadin-check-box`,
///   `max-length`) and start with `:` for layout slot attributes (`:expand`)
/// - A bare attribute (`checked`) is written with an empty value, which reads
///   back as `true`
/// - String literal children become the element's text
///
/// # Example
///
/// ```ignore
/// let design = design! {
///     <vaadin-vertical-layout spacing="false">
///         <vaadin-text-field _id="name" caption="Name" max-length="20" />
///         <vaadin-button :right>"Save"</vaadin-button>
///     </vaadin-vertical-layout>
/// };
/// ```
#[proc_macro]
pub fn design(input: TokenStream) -> TokenStream {
    design_macro::design_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
