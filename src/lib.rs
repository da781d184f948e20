// src/lib.rs
pub mod config;
pub mod errors;
pub mod languages;
pub mod syntax;
pub mod backends;
pub mod runner;
pub mod models;
pub mod settings;
pub mod banner;
pub mod api;
