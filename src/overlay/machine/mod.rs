//! Tool gesture handling: the pure state machine plus the Bevy systems
//! that feed it input and commit its finished shapes.

mod machine;
mod systems;
mod text_edit;

pub use machine::{DownAction, InFlight, ToolMachine};
pub use systems::{cancel_on_overlay_hidden, handle_pointer_input, watch_wheel_for_pass_through};
pub use text_edit::{text_edit_ui, TextEditState};
