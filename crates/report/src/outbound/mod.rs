pub mod orm;
pub mod repository;
