pub mod controls_view;
pub mod status_view;

pub use controls_view::{ControlAction, ControlsView};
pub use status_view::StatusView;
