pub mod area;
pub mod image;
pub mod store;
