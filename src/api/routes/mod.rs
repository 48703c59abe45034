pub mod cache;
pub mod presence;
pub mod users;
