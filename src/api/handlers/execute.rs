// src/api/handlers/execute.rs
use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::api::AppState;
use crate::errors::ExecError;
use crate::languages;
use crate::models::{ExecutionResult, TestCase};
use crate::runner;
use crate::syntax;

#[derive(Clone, Deserialize)]
pub struct ExecuteRequest {
    pub source_code: String,
    pub language: String,
    pub test_cases: Vec<TestCase>,
}

#[derive(Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub id: String,
    pub completed_at: String,
    pub result: ExecutionResult,
}

/// Maps a run that could not start to an HTTP error.
pub fn error_response(e: &ExecError) -> HttpResponse {
    let body = json!({ "error": e.to_string() });
    match e {
        ExecError::UnsupportedLanguage(_) | ExecError::InvalidApiKey { .. } => {
            HttpResponse::BadRequest().json(body)
        }
        ExecError::MissingCredentials(_) => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

pub async fn execute(
    state: web::Data<AppState>,
    req: web::Json<ExecuteRequest>,
) -> Result<HttpResponse> {
    let req_body = req.into_inner();

    if let Err(e) = languages::describe(&req_body.language) {
        return Ok(error_response(&e));
    }

    // Only code that passes the pre-check is sent to the backend.
    let report = syntax::check_syntax(&req_body.source_code, &req_body.language);
    if !report.valid {
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "error": "Submission rejected by the pre-check",
            "errors": report.errors
        })));
    }

    let run_id = Uuid::new_v4().to_string();

    match runner::execute_code(
        state.executor.as_ref(),
        &req_body.source_code,
        &req_body.language,
        &req_body.test_cases,
    )
    .await
    {
        Ok(result) => {
            log::info!(
                "Run {} finished with {} ({}/{})",
                run_id,
                result.status,
                result.test_cases_passed,
                result.total_test_cases
            );
            Ok(HttpResponse::Ok().json(ExecuteResponse {
                id: run_id,
                completed_at: chrono::Utc::now().to_rfc3339(),
                result,
            }))
        }
        Err(e) => {
            if e.is_precondition() {
                log::warn!("Run {} rejected: {}", run_id, e);
            } else {
                log::error!("Run {} could not start: {}", run_id, e);
            }
            Ok(error_response(&e))
        }
    }
}
