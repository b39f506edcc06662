pub mod event;
pub mod user;
pub mod ws;
