pub mod note;
pub mod palette;
pub mod repository;
pub mod store;
pub mod view;
