//! Reusable UI components.

mod dropdown_list;
mod field_parts;
mod help_bar;
mod spinner;

pub use dropdown_list::{DropdownList, DropdownListAction, MAX_VISIBLE_ITEMS};
pub use field_parts::{render_description, render_errors, render_label, text_height};
pub use help_bar::render_context_help;
pub use spinner::Spinner;
