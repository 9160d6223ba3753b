pub mod config;
pub mod month;
pub mod record;
pub mod summary;
pub mod user;
