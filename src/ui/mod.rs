pub mod board;
pub mod composer;
