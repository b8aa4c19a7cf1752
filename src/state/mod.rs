// State management module
// Handles the chat widget's local UI state

pub mod widget_state;

pub use widget_state::{WidgetAction, WidgetState};
