pub mod focus_nav;
pub mod multi_dropdown;

pub use focus_nav::{FocusOutcome, focus_next, is_inert};
pub use multi_dropdown::{
    ChangeDetail, DropdownConfig, MultiDropdown, TAG, ToggleDetail, define, define_with,
};
