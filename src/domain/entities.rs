pub mod image;
pub mod token;
