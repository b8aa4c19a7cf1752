// UI module
// Contains the landing layout, the chat window and its components

pub mod components;
pub mod layout;

pub use layout::render_app_layout;
