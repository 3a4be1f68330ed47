//! design! macro tests. Run with `--features macros`.
#![cfg(feature = "macros")]

use pretty_assertions::assert_eq;

use trellis::components::{Alignment, Button, NativeSelect, OrderedLayout, TextField};
use trellis::design;
use trellis::design::DesignContext;
use trellis::testing::design_to_string;
use trellis::HasValue;

#[test]
fn test_macro_builds_markup() {
    let design = design! {
        <vaadin-horizontal-layout margin>
            <vaadin-text-field _id="name" caption="Name" max-length="20" />
            <vaadin-button :middle :center>"Save & close"</vaadin-button>
        </vaadin-horizontal-layout>
    };
    insta::assert_snapshot!(design_to_string(&design), @r#"
    <vaadin-horizontal-layout margin>
      <vaadin-text-field _id="name" caption="Name" max-length="20"></vaadin-text-field>
      <vaadin-button :middle :center>Save &amp; close</vaadin-button>
    </vaadin-horizontal-layout>
    "#);
}

#[test]
fn test_macro_design_reads_into_components() {
    let design = design! {
        <vaadin-horizontal-layout margin>
            <vaadin-text-field _id="name" caption="Name" max-length="20" value="Ann" />
            <vaadin-button :middle :center>"Save"</vaadin-button>
        </vaadin-horizontal-layout>
    };
    let mut ctx = DesignContext::new();
    let root = ctx.read_root(&design).unwrap();
    let layout = root.as_any().downcast_ref::<OrderedLayout>().unwrap();
    assert!(layout.is_margin());

    let field = layout.child::<TextField>(0).unwrap();
    assert_eq!(field.max_length(), 20);
    assert_eq!(field.value(), "Ann");
    assert_eq!(layout.child::<Button>(1).unwrap().caption(), Some("Save"));
    assert_eq!(layout.alignment(1), Some(Alignment::MIDDLE_CENTER));
    assert!(ctx.element_by_local_id("name").is_some());
}

#[test]
fn test_macro_options() {
    let design = design! {
        <vaadin-native-select empty-selection-allowed="false">
            <option item="s">"Small"</option>
            <option item="m" selected>"Medium"</option>
        </vaadin-native-select>
    };
    let root = DesignContext::new().read_root(&design).unwrap();
    let select = root.as_any().downcast_ref::<NativeSelect<String>>().unwrap();
    assert!(!select.is_empty_selection_allowed());
    assert_eq!(select.selected_item(), Some("m".to_owned()));
}
