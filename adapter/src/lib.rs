pub mod database;
pub mod media;
pub mod realtime;
pub mod redis;
pub mod repository;
