pub mod figure_panel;
pub mod side_panel;
