// src/api/handlers/languages.rs
use actix_web::{HttpResponse, Result};

use crate::languages;

pub async fn list_languages() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(languages::list_languages()))
}
