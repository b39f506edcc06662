pub mod media;
pub mod model;
pub mod realtime;
pub mod repository;
