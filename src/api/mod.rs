// API module - HTTP endpoints

pub mod auth;
pub mod history;
pub mod middleware;
pub mod students;
pub mod users;
