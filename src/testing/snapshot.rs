//! Text renderings of designs and payloads for snapshot assertions.

use serde::Serialize;

use crate::component::Component;
use crate::data::DataChange;
use crate::design::{to_html, Design, DesignContext};
use crate::error::DesignError;
use crate::session::ComponentChange;

/// Render a whole design as markup. An empty design renders as `""`.
pub fn design_to_string(design: &Design) -> String {
    design
        .root()
        .map(|root| to_html(design, root))
        .unwrap_or_default()
}

/// Write `component` with default settings and render the markup.
pub fn component_to_string(component: &dyn Component) -> Result<String, DesignError> {
    let design = DesignContext::new().write_component(component)?;
    Ok(design_to_string(&design))
}

/// Pretty JSON of one item payload.
pub fn payload_to_string(data: &DataChange) -> String {
    pretty(data)
}

/// Pretty JSON of collected changes, one document per change.
pub fn changes_to_string(changes: &[ComponentChange]) -> String {
    changes.iter().map(pretty).collect::<Vec<_>>().join("\n")
}

fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
