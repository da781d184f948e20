// src/api/handlers/syntax.rs
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

use crate::api::handlers::error_response;
use crate::languages;
use crate::syntax;

#[derive(Deserialize)]
pub struct SyntaxCheckRequest {
    pub source_code: String,
    pub language: String,
}

pub async fn check_syntax(req: web::Json<SyntaxCheckRequest>) -> Result<HttpResponse> {
    if let Err(e) = languages::describe(&req.language) {
        return Ok(error_response(&e));
    }
    let report = syntax::check_syntax(&req.source_code, &req.language);
    Ok(HttpResponse::Ok().json(report))
}
