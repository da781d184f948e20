// src/api/state.rs
use crate::backends::ExecutionClient;
use crate::config::AppConfig;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub executor: Arc<ExecutionClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let executor = ExecutionClient::from_config(Client::new(), &config.backend);
        Self {
            config: Arc::new(config),
            executor: Arc::new(executor),
        }
    }
}
