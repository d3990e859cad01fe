
use actix_web::{http::StatusCode, test, web, App};
use contact_backend::{routes::configure_routes, AppState};
use serde_json::{json, Value};
use test_utils::*;

macro_rules! spawn_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes::<MockSubmissionRepo, MockNotify>),
        )
        .await
    };
}

fn state(
    capacity: usize,
    repo: MockSubmissionRepo,
    notifier: MockNotify,
) -> AppState<MockSubmissionRepo, MockNotify> {
    AppState::with_handler(contact_handler(capacity, repo, notifier), false)
}

#[actix_rt::test]
async fn valid_submission_returns_success_envelope_with_the_stored_id() {
    let app = spawn_app!(state(5, repo_saving("abc123"), notifier_sending_both()));

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "message": "This is a long enough test message.",
            "subject": "Hi"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["message"],
        json!("Thank you for your message. We'll get back to you soon!")
    );
    assert_eq!(body["data"]["id"], json!("abc123"));
    assert!(body["timestamp"].is_string());
}

#[actix_rt::test]
async fn unknown_input_fields_are_ignored() {
    let app = spawn_app!(state(5, repo_saving("abc123"), notifier_sending_both()));

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "message": "This is a long enough test message.",
            "token": "ignored"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn invalid_submission_returns_field_errors_without_side_effects() {
    let app = spawn_app!(state(5, untouched_repo(), untouched_notifier()));

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "John Doe",
            "email": "invalid-email",
            "message": "short"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Validation failed"));

    let details = body["details"].as_array().unwrap();
    let fields: Vec<&str> = details
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "message"]);
    assert_eq!(
        details[0]["message"],
        json!("Please provide a valid email address")
    );
}

#[actix_rt::test]
async fn requests_past_capacity_are_rejected_with_429() {
    let app = spawn_app!(state(1, repo_saving("abc123"), notifier_sending_both()));

    let first = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "message": "This is a long enough test message."
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, first).await.status(),
        StatusCode::OK
    );

    let second = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "message": "This is a long enough test message."
        }))
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Too many requests. Please try again later.")
    );
}

#[actix_rt::test]
async fn storage_failure_surfaces_as_a_generic_internal_error() {
    let mut repo = MockSubmissionRepo::new();
    repo.expect_save().times(1).returning(|_| {
        Err(contact_backend::errors::AppError::StorageError(
            "firestore unavailable".into(),
        ))
    });

    let app = spawn_app!(state(5, repo, untouched_notifier()));

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "message": "This is a long enough test message."
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Internal server error. Please try again later.")
    );
    assert!(body.get("details").is_none());
}

#[actix_rt::test]
async fn health_reports_status_timestamp_and_version() {
    let app = spawn_app!(state(5, untouched_repo(), untouched_notifier()));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    assert!(body["timestamp"].is_string());
}

#[actix_rt::test]
async fn unmatched_routes_return_the_not_found_envelope() {
    let app = spawn_app!(state(5, untouched_repo(), untouched_notifier()));

    let req = test::TestRequest::get().uri("/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Endpoint not found"));
}

#[actix_rt::test]
async fn malformed_json_returns_a_bad_request_envelope() {
    let app = spawn_app!(state(5, untouched_repo(), untouched_notifier()));

    let req = test::TestRequest::post()
        .uri("/contact")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}
