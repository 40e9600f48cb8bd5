//! Data models

pub mod book;
pub mod rental;
pub mod user;
