// tests/api_tests.rs
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

use codejudge::api::handlers::ExecuteResponse;
use codejudge::api::{configure_routes, AppState};
use codejudge::config::AppConfig;
use codejudge::models::ExecutionStatus;
use codejudge::settings::Settings;

fn scratch_settings_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("codejudge-api-{}", Uuid::new_v4()))
        .join("settings.toml")
}

fn state_with(vars: &[(&str, &str)]) -> AppState {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = AppConfig::from_lookup(
        |key| vars.get(key).cloned(),
        &Settings::default(),
        scratch_settings_path(),
    )
    .unwrap();
    AppState::new(config)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_reports_backend() {
    let app = app!(state_with(&[("EXECUTION_BACKEND", "piston")]));
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "piston");
}

#[actix_web::test]
async fn test_list_languages() {
    let app = app!(state_with(&[]));
    let req = test::TestRequest::get().uri("/api/v1/languages").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.len(), 8);
    assert_eq!(body[0], json!({ "key": "python", "name": "Python 3.8.1", "extension": "py" }));
}

#[actix_web::test]
async fn test_syntax_check_endpoint() {
    let app = app!(state_with(&[]));

    let req = test::TestRequest::post()
        .uri("/api/v1/syntax/check")
        .set_json(json!({ "source_code": "", "language": "python" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "valid": false, "errors": ["Code cannot be empty"] }));

    let req = test::TestRequest::post()
        .uri("/api/v1/syntax/check")
        .set_json(json!({ "source_code": "x", "language": "cobol" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_execute_rejects_unknown_language() {
    let app = app!(state_with(&[("RAPIDAPI_KEY", "test-key-0123456789abcdef")]));
    let req = test::TestRequest::post()
        .uri("/api/v1/execute")
        .set_json(json!({
            "source_code": "DISPLAY 'HI'.",
            "language": "cobol",
            "test_cases": [{ "input": "", "expected_output": "HI" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_execute_rejects_code_failing_the_precheck() {
    let app = app!(state_with(&[("RAPIDAPI_KEY", "test-key-0123456789abcdef")]));
    let req = test::TestRequest::post()
        .uri("/api/v1/execute")
        .set_json(json!({
            "source_code": "import os\nprint(os.listdir())",
            "language": "python",
            "test_cases": [{ "input": "", "expected_output": "" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0], "System imports are not allowed for security reasons");
}

#[actix_web::test]
async fn test_execute_without_credentials_is_unavailable() {
    let app = app!(state_with(&[("RAPIDAPI_KEY", "your-rapidapi-key-here")]));
    let req = test::TestRequest::post()
        .uri("/api/v1/execute")
        .set_json(json!({
            "source_code": "print(1)",
            "language": "python",
            "test_cases": [{ "input": "", "expected_output": "1" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

async fn fake_piston_execute(body: web::Json<Value>) -> HttpResponse {
    let stdin = body["stdin"].as_str().unwrap_or_default().to_string();
    HttpResponse::Ok().json(json!({
        "run": { "stdout": format!("{}\n", stdin), "stderr": "", "output": "", "code": 0, "signal": null }
    }))
}

#[actix_web::test]
async fn test_execute_over_piston() {
    let server = HttpServer::new(|| App::new().route("/execute", web::post().to(fake_piston_execute)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let base = format!("http://{}", server.addrs()[0]);
    actix_rt::spawn(server.run());

    let app = app!(state_with(&[("EXECUTION_BACKEND", "piston"), ("PISTON_API_BASE", base.as_str())]));
    let req = test::TestRequest::post()
        .uri("/api/v1/execute")
        .set_json(json!({
            "source_code": "print(input())",
            "language": "python",
            "test_cases": [
                { "input": "echo", "expected_output": "echo" },
                { "input": "left", "expected_output": "right" }
            ]
        }))
        .to_request();
    let resp: ExecuteResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.result.status, ExecutionStatus::Success);
    assert_eq!(resp.result.test_cases_passed, 1);
    assert_eq!(resp.result.total_test_cases, 2);
    assert!(!resp.result.all_passed());
    assert!(!resp.id.is_empty());
}

#[actix_web::test]
async fn test_api_key_settings_round() {
    let state = state_with(&[]);
    let settings_path = state.config.settings_path.clone();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/v1/settings/api-key").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "backend": "judge0", "configured": false }));

    let req = test::TestRequest::put()
        .uri("/api/v1/settings/api-key")
        .set_json(json!({ "api_key": "short" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/v1/settings/api-key")
        .set_json(json!({ "api_key": "abcdefghijklmnopqrstuvwxyz" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["saved"], true);
    assert_eq!(
        Settings::load(&settings_path).unwrap().rapidapi_key.as_deref(),
        Some("abcdefghijklmnopqrstuvwxyz")
    );

    let req = test::TestRequest::delete().uri("/api/v1/settings/api-key").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["removed"], true);
    assert_eq!(Settings::load(&settings_path).unwrap().rapidapi_key, None);

    let _ = std::fs::remove_dir_all(settings_path.parent().unwrap());
}

#[actix_web::test]
async fn test_concurrent_api_key_saves() {
    let state = state_with(&[]);
    let settings_path = state.config.settings_path.clone();
    let app = app!(state);

    let first = test::TestRequest::put()
        .uri("/api/v1/settings/api-key")
        .set_json(json!({ "api_key": "first-key-abcdefghijklmnop" }))
        .to_request();
    let second = test::TestRequest::put()
        .uri("/api/v1/settings/api-key")
        .set_json(json!({ "api_key": "second-key-abcdefghijklmnop" }))
        .to_request();

    let (first, second) = tokio::join!(
        test::call_service(&app, first),
        test::call_service(&app, second)
    );
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let stored = Settings::load(&settings_path).unwrap().rapidapi_key.unwrap();
    assert!(stored == "first-key-abcdefghijklmnop" || stored == "second-key-abcdefghijklmnop");

    let _ = std::fs::remove_dir_all(settings_path.parent().unwrap());
}
