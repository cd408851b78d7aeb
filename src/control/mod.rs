//! Control tree: shared control state, the widget trait, the arena and
//! pack layout.

pub mod layout;
pub mod state;
pub mod tree;
pub mod widget;

pub use state::ControlState;
pub use tree::{ControlId, ControlTree};
pub use widget::{fill_background, EventCtx, Widget};
