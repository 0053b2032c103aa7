pub mod config;
pub mod database;
pub mod handlers;
pub mod helpers;
pub mod integrations;

pub use database::Database;
