pub mod auth;
pub mod contacts;
pub mod health;
pub mod notes;
pub mod posts;
pub mod users;
