pub mod home;
pub mod images;
pub mod search;
pub mod system;
