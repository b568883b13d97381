pub mod analysis;
pub mod entities;
pub mod search;
pub mod use_cases;
