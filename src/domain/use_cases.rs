pub mod extractors;
pub mod library;
