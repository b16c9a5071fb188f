pub mod form;
pub mod label;
pub mod swatches;
pub mod text_area;
pub mod text_input;
pub mod widget;
