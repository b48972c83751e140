pub mod auth;
pub mod progress;
pub mod review;
pub mod stats;
pub mod users;
pub mod vocabulary;
