pub mod event;
pub mod health;
pub mod user;
pub mod ws;
