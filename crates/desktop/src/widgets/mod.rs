pub mod action_button;
pub mod example_gallery;
pub mod file_row;
pub mod preview_panel;
