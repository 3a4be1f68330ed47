//! Concrete components: buttons, fields, selects and layouts.

pub mod button;
pub mod check_box;
pub mod check_box_group;
pub mod color_picker;
pub mod combo_box;
pub mod list_select;
pub mod native_select;
pub mod ordered_layout;
pub mod radio_button_group;
pub mod text_field;

pub use button::Button;
pub use check_box::CheckBox;
pub use check_box_group::CheckBoxGroup;
pub use color_picker::{ColorPicker, PopupStyle, PopupVisibility};
pub use combo_box::ComboBox;
pub use list_select::ListSelect;
pub use native_select::NativeSelect;
pub use ordered_layout::{Alignment, Horizontal, OrderedLayout, Orientation, Vertical};
pub use radio_button_group::RadioButtonGroup;
pub use text_field::TextField;
