// src/api/handlers/mod.rs
mod health;
mod languages;
mod syntax;
mod execute;
mod settings;

pub use health::health_check;
pub use languages::list_languages;
pub use syntax::check_syntax;
pub use execute::{execute, error_response, ExecuteRequest, ExecuteResponse};
pub use settings::{get_api_key_status, save_api_key, remove_api_key};
