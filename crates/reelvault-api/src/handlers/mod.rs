pub mod admin;
pub mod health;
pub mod sessions;
pub mod uploads;
pub mod users;
pub mod videos;
