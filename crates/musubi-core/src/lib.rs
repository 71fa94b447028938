pub mod catalogue;
pub mod config;
pub mod error;
pub mod mapper;
pub mod mapping;
pub mod media;
pub mod models;
pub mod normalize;
pub mod titles;
