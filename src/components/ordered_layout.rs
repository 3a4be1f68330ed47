//! OrderedLayout: vertical and horizontal layouts that own their children.
//!
//! Per-child settings (alignment and expand ratio) are written as colon
//! attributes on the child element: `:middle`, `:bottom`, `:center`,
//! `:right` and `:expand` (bare means a ratio of 1).

use std::any::Any;

use serde_json::{json, Value};

use crate::component::{CommonState, Component};
use crate::design::attribute::{read_into, write_attribute};
use crate::design::{Design, DesignContext, ElementId};
use crate::error::{ComponentError, DesignError};
use crate::value::Sizing;

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vertical {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Horizontal {
    #[default]
    Left,
    Center,
    Right,
}

/// Position of a child inside its slot. Defaults to top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Alignment {
    pub const TOP_LEFT: Alignment = Alignment::new(Vertical::Top, Horizontal::Left);
    pub const MIDDLE_CENTER: Alignment = Alignment::new(Vertical::Middle, Horizontal::Center);
    pub const BOTTOM_RIGHT: Alignment = Alignment::new(Vertical::Bottom, Horizontal::Right);

    pub const fn new(vertical: Vertical, horizontal: Horizontal) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    fn as_str(&self) -> String {
        let vertical = match self.vertical {
            Vertical::Top => "top",
            Vertical::Middle => "middle",
            Vertical::Bottom => "bottom",
        };
        let horizontal = match self.horizontal {
            Horizontal::Left => "left",
            Horizontal::Center => "center",
            Horizontal::Right => "right",
        };
        format!("{vertical}-{horizontal}")
    }
}

// ---------------------------------------------------------------------------
// OrderedLayout
// ---------------------------------------------------------------------------

/// Direction of an [`OrderedLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

struct Slot {
    component: Box<dyn Component>,
    alignment: Alignment,
    expand_ratio: f32,
}

/// Lays out children in one column or one row.
///
/// A vertical layout defaults to full width with spacing and margin; a
/// horizontal layout sizes to its content with spacing and no margin.
pub struct OrderedLayout {
    common: CommonState,
    orientation: Orientation,
    spacing: bool,
    margin: bool,
    slots: Vec<Slot>,
}

impl OrderedLayout {
    pub fn vertical() -> Self {
        Self {
            common: CommonState::with_default_sizing(Sizing::full_width()),
            orientation: Orientation::Vertical,
            spacing: true,
            margin: true,
            slots: Vec::new(),
        }
    }

    pub fn horizontal() -> Self {
        Self {
            common: CommonState::new(),
            orientation: Orientation::Horizontal,
            spacing: true,
            margin: false,
            slots: Vec::new(),
        }
    }

    /// Append a child (builder).
    pub fn with_component(mut self, component: impl Component) -> Self {
        self.add_component(Box::new(component));
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn default_margin(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    pub fn is_spacing(&self) -> bool {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: bool) {
        self.spacing = spacing;
    }

    pub fn is_margin(&self) -> bool {
        self.margin
    }

    pub fn set_margin(&mut self, margin: bool) {
        self.margin = margin;
    }

    // ----- Children -----

    /// Append a child. Returns its index.
    pub fn add_component(&mut self, component: Box<dyn Component>) -> usize {
        self.slots.push(Slot {
            component,
            alignment: Alignment::default(),
            expand_ratio: 0.0,
        });
        self.slots.len() - 1
    }

    pub fn remove_component(&mut self, index: usize) -> Option<Box<dyn Component>> {
        (index < self.slots.len()).then(|| self.slots.remove(index).component)
    }

    pub fn remove_all_components(&mut self) {
        self.slots.clear();
    }

    pub fn component_count(&self) -> usize {
        self.slots.len()
    }

    pub fn component(&self, index: usize) -> Option<&dyn Component> {
        self.slots.get(index).map(|slot| slot.component.as_ref())
    }

    pub fn component_mut(&mut self, index: usize) -> Option<&mut dyn Component> {
        match self.slots.get_mut(index) {
            Some(slot) => Some(slot.component.as_mut()),
            None => None,
        }
    }

    /// Child at `index` downcast to its concrete type.
    pub fn child<C: Component>(&self, index: usize) -> Option<&C> {
        self.component(index)?.as_any().downcast_ref::<C>()
    }

    pub fn child_mut<C: Component>(&mut self, index: usize) -> Option<&mut C> {
        self.component_mut(index)?.as_any_mut().downcast_mut::<C>()
    }

    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.slots.iter().map(|slot| slot.component.as_ref())
    }

    pub fn alignment(&self, index: usize) -> Option<Alignment> {
        self.slots.get(index).map(|slot| slot.alignment)
    }

    pub fn set_alignment(&mut self, index: usize, alignment: Alignment) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.alignment = alignment;
        }
    }

    pub fn expand_ratio(&self, index: usize) -> Option<f32> {
        self.slots.get(index).map(|slot| slot.expand_ratio)
    }

    /// Share of the extra space the child at `index` receives.
    pub fn set_expand_ratio(&mut self, index: usize, ratio: f32) -> Result<(), ComponentError> {
        if ratio.is_nan() || ratio < 0.0 {
            return Err(ComponentError::illegal(
                "expandRatio",
                format!("{ratio} is negative"),
            ));
        }
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            ComponentError::illegal("expandRatio", format!("no child at index {index}"))
        })?;
        slot.expand_ratio = ratio;
        Ok(())
    }
}

fn write_slot_attributes(design: &mut Design, element: ElementId, slot: &Slot) {
    let Some(data) = design.get_mut(element) else {
        return;
    };
    match slot.alignment.vertical {
        Vertical::Middle => data.set_attr(":middle", ""),
        Vertical::Bottom => data.set_attr(":bottom", ""),
        Vertical::Top => {}
    }
    match slot.alignment.horizontal {
        Horizontal::Center => data.set_attr(":center", ""),
        Horizontal::Right => data.set_attr(":right", ""),
        Horizontal::Left => {}
    }
    if slot.expand_ratio == 1.0 {
        data.set_attr(":expand", "");
    } else if slot.expand_ratio > 0.0 {
        data.set_attr(":expand", slot.expand_ratio.to_string());
    }
}

fn read_slot_alignment(design: &Design, element: ElementId) -> Alignment {
    let Some(data) = design.get(element) else {
        return Alignment::default();
    };
    let vertical = if data.has_attr(":middle") {
        Vertical::Middle
    } else if data.has_attr(":bottom") {
        Vertical::Bottom
    } else {
        Vertical::Top
    };
    let horizontal = if data.has_attr(":center") {
        Horizontal::Center
    } else if data.has_attr(":right") {
        Horizontal::Right
    } else {
        Horizontal::Left
    };
    Alignment::new(vertical, horizontal)
}

fn read_slot_expand_ratio(design: &Design, element: ElementId) -> Option<f32> {
    let value = design.get(element)?.attr(":expand")?;
    if value.is_empty() {
        return Some(1.0);
    }
    match value.trim().parse::<f32>() {
        Ok(ratio) if ratio >= 0.0 => Some(ratio),
        _ => {
            tracing::debug!(value, "failed to parse expand ratio");
            None
        }
    }
}

impl Component for OrderedLayout {
    fn tag_name(&self) -> &'static str {
        match self.orientation {
            Orientation::Vertical => "vertical-layout",
            Orientation::Horizontal => "horizontal-layout",
        }
    }

    fn common(&self) -> &CommonState {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonState {
        &mut self.common
    }

    fn state(&self) -> Value {
        let mut state = self.common.to_state();
        state.insert("spacing".into(), json!(self.spacing));
        state.insert("margin".into(), json!(self.margin));
        let children: Vec<Value> = self
            .slots
            .iter()
            .map(|slot| {
                json!({
                    "tag": slot.component.tag_name(),
                    "alignment": slot.alignment.as_str(),
                    "expandRatio": slot.expand_ratio,
                })
            })
            .collect();
        state.insert("children".into(), Value::Array(children));
        Value::Object(state)
    }

    fn write_design(
        &self,
        design: &mut Design,
        element: ElementId,
        ctx: &mut DesignContext,
    ) -> Result<(), DesignError> {
        if let Some(data) = design.get_mut(element) {
            self.common.write_design(data, ctx);
            write_attribute(data, "spacing", &self.spacing, &true, ctx);
            write_attribute(data, "margin", &self.margin, &self.default_margin(), ctx);
        }
        for slot in &self.slots {
            let child = ctx.write_child(design, element, slot.component.as_ref())?;
            write_slot_attributes(design, child, slot);
        }
        Ok(())
    }

    fn read_design(
        &mut self,
        design: &Design,
        element: ElementId,
        ctx: &mut DesignContext,
    ) -> Result<(), DesignError> {
        if let Some(data) = design.get(element) {
            self.common.read_design(data)?;
            read_into(data, "spacing", &mut self.spacing)?;
            read_into(data, "margin", &mut self.margin)?;
        }
        self.slots.clear();
        for &child in design.children(element) {
            let component = ctx.read_component(design, child)?;
            self.slots.push(Slot {
                component,
                alignment: read_slot_alignment(design, child),
                expand_ratio: read_slot_expand_ratio(design, child).unwrap_or(0.0),
            });
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::component::HasValue;
    use crate::components::{Button, CheckBox, TextField};
    use crate::design::html::to_html;

    fn form() -> OrderedLayout {
        let mut layout = OrderedLayout::vertical()
            .with_component(TextField::with_caption("Name"))
            .with_component(CheckBox::with_caption("Subscribe"))
            .with_component(Button::with_caption("Send"));
        layout.set_expand_ratio(0, 1.0).unwrap();
        layout.set_alignment(2, Alignment::BOTTOM_RIGHT);
        layout
    }

    #[test]
    fn defaults_per_orientation() {
        let vertical = OrderedLayout::vertical();
        assert!(vertical.is_margin());
        assert!(vertical.common().sizing.width.is_full());
        let horizontal = OrderedLayout::horizontal();
        assert!(!horizontal.is_margin());
        assert!(horizontal.common().sizing.is_undefined());
        assert_eq!(horizontal.tag_name(), "horizontal-layout");
    }

    #[test]
    fn design_markup() {
        let mut layout = form();
        layout.set_margin(false);
        let design = DesignContext::new().write_component(&layout).unwrap();
        insta::assert_snapshot!(to_html(&design, design.root().unwrap()), @r#"
        <vaadin-vertical-layout margin="false">
          <vaadin-text-field caption="Name" :expand></vaadin-text-field>
          <vaadin-check-box caption="Subscribe"></vaadin-check-box>
          <vaadin-button :bottom :right>Send</vaadin-button>
        </vaadin-vertical-layout>
        "#);
    }

    #[test]
    fn design_round_trip() {
        let mut layout = form();
        layout.set_expand_ratio(1, 0.5).unwrap();
        layout.child_mut::<CheckBox>(1).unwrap().set_value(true);
        let mut ctx = DesignContext::new();
        let design = ctx.write_component(&layout).unwrap();

        let read = DesignContext::new().read_root(&design).unwrap();
        let read = read.as_any().downcast_ref::<OrderedLayout>().unwrap();
        assert_eq!(read.component_count(), 3);
        assert_eq!(read.expand_ratio(0), Some(1.0));
        assert_eq!(read.expand_ratio(1), Some(0.5));
        assert_eq!(read.alignment(2), Some(Alignment::BOTTOM_RIGHT));
        assert!(read.child::<CheckBox>(1).unwrap().value());
        assert_eq!(read.child::<Button>(2).unwrap().caption(), Some("Send"));
    }

    #[test]
    fn invalid_expand_ratio_is_ignored() {
        let mut design = Design::new();
        let root = design.insert(crate::design::ElementData::new("vaadin-horizontal-layout"));
        design.insert_child(
            root,
            crate::design::ElementData::new("vaadin-button").with_attr(":expand", "lots"),
        );
        let read = DesignContext::new().read_root(&design).unwrap();
        let read = read.as_any().downcast_ref::<OrderedLayout>().unwrap();
        assert_eq!(read.expand_ratio(0), Some(0.0));
    }

    #[test]
    fn negative_expand_ratio_is_rejected() {
        let mut layout = form();
        assert!(layout.set_expand_ratio(0, -1.0).is_err());
        assert!(layout.set_expand_ratio(9, 1.0).is_err());
        assert_eq!(layout.expand_ratio(0), Some(1.0));
    }

    #[test]
    fn state_lists_children() {
        let state = form().state();
        assert_eq!(state["children"][2]["alignment"], "bottom-right");
        assert_eq!(state["children"][0]["tag"], "text-field");
        assert_eq!(state["margin"], true);
    }
}
