//! Data models for the application

mod user;
mod video;

pub use user::*;
pub use video::*;
