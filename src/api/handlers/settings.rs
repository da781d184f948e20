// src/api/handlers/settings.rs
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use serde_json::json;

use crate::api::handlers::error_response;
use crate::api::AppState;
use crate::backends::ExecutionBackend;
use crate::settings;

#[derive(Deserialize)]
pub struct SaveApiKeyRequest {
    pub api_key: String,
}

pub async fn get_api_key_status(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "backend": state.executor.backend_name(),
        "configured": state.executor.ensure_configured().is_ok()
    })))
}

/// Persists the key for the next start; the running client keeps its configuration.
pub async fn save_api_key(
    state: web::Data<AppState>,
    req: web::Json<SaveApiKeyRequest>,
) -> Result<HttpResponse> {
    let path = state.config.settings_path.clone();
    let key = req.into_inner().api_key;

    match web::block(move || settings::store_api_key(&path, &key)).await? {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "saved": true,
            "restart_required": true
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn remove_api_key(state: web::Data<AppState>) -> Result<HttpResponse> {
    let path = state.config.settings_path.clone();

    match web::block(move || settings::clear_api_key(&path)).await? {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "removed": true,
            "restart_required": true
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}
