pub mod chat;
pub mod health;
pub mod home;
pub mod manifest;
pub mod metrics_handler;
pub mod provider;
