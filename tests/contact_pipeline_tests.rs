
use contact_backend::{
    entities::submission::{ContactForm, SubmissionStatus},
    errors::AppError,
    use_cases::contact::ContactHandler,
};
use test_utils::*;

#[tokio::test]
async fn success_persists_then_notifies_and_returns_the_stored_id() {
    let mut repo = MockSubmissionRepo::new();
    repo.expect_save()
        .times(1)
        .withf(|submission| {
            submission.name == "John Doe"
                && submission.email == "john@example.com"
                && submission.status == SubmissionStatus::New
                && submission.metadata.ip_address == "203.0.113.7"
                && submission.metadata.user_agent == "integration-test"
                && submission.metadata.source == "api"
        })
        .returning(|_| Ok("abc123".to_string()));

    let mut notifier = MockNotify::new();
    notifier
        .expect_send_confirmation()
        .times(1)
        .withf(|fields, id| fields.email == "john@example.com" && id == "abc123")
        .returning(|_, _| Ok(()));
    notifier
        .expect_send_admin_notice()
        .times(1)
        .withf(|fields, id| fields.name == "John Doe" && id == "abc123")
        .returning(|_, _| Ok(()));

    let handler = contact_handler(5, repo, notifier);
    let receipt = handler
        .handle_submission(valid_form(), &request_context())
        .await
        .unwrap();

    assert_eq!(receipt.id, "abc123");
}

#[tokio::test]
async fn notification_failure_does_not_change_the_outcome() {
    let repo = repo_saving("abc123");

    let mut notifier = MockNotify::new();
    notifier
        .expect_send_confirmation()
        .times(1)
        .returning(|_, _| Err(AppError::NotificationError("sendgrid down".into())));
    notifier
        .expect_send_admin_notice()
        .times(1)
        .returning(|_, _| Err(AppError::NotificationError("sendgrid down".into())));

    let handler = contact_handler(5, repo, notifier);
    let receipt = handler
        .handle_submission(valid_form(), &request_context())
        .await
        .unwrap();

    assert_eq!(receipt.id, "abc123");
}

#[tokio::test]
async fn persistence_failure_is_fatal_and_skips_notification() {
    let mut repo = MockSubmissionRepo::new();
    repo.expect_save()
        .times(1)
        .returning(|_| Err(AppError::StorageError("firestore unavailable".into())));

    let handler = contact_handler(5, repo, untouched_notifier());
    let result = handler
        .handle_submission(valid_form(), &request_context())
        .await;

    assert!(matches!(result, Err(AppError::StorageError(_))));
}

#[tokio::test]
async fn validation_failure_reaches_no_collaborator() {
    let handler = contact_handler(5, untouched_repo(), untouched_notifier());

    let result = handler
        .handle_submission(ContactForm::default(), &request_context())
        .await;

    match result {
        Err(AppError::ValidationError(errors)) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, vec!["name", "email", "message"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn admission_counts_attempts_regardless_of_validity() {
    // Capacity 2: one invalid and one valid attempt fill the window.
    let repo = repo_saving("abc123");
    let notifier = notifier_sending_both();
    let handler = contact_handler(2, repo, notifier);
    let ctx = request_context();

    let invalid = handler.handle_submission(ContactForm::default(), &ctx).await;
    assert!(matches!(invalid, Err(AppError::ValidationError(_))));

    let valid = handler.handle_submission(valid_form(), &ctx).await;
    assert!(valid.is_ok());

    let limited = handler.handle_submission(valid_form(), &ctx).await;
    assert!(matches!(limited, Err(AppError::RateLimited)));
}

#[tokio::test]
async fn rate_limited_requests_touch_nothing() {
    let handler = ContactHandler::new(limiter(0), untouched_repo(), untouched_notifier());

    let result = handler
        .handle_submission(valid_form(), &request_context())
        .await;

    assert!(matches!(result, Err(AppError::RateLimited)));
}

#[tokio::test]
async fn each_admitted_valid_request_creates_a_new_submission() {
    let mut repo = MockSubmissionRepo::new();
    let mut counter = 0;
    repo.expect_save().times(2).returning(move |_| {
        counter += 1;
        Ok(format!("id-{counter}"))
    });

    let mut notifier = MockNotify::new();
    notifier
        .expect_send_confirmation()
        .times(2)
        .returning(|_, _| Ok(()));
    notifier
        .expect_send_admin_notice()
        .times(2)
        .returning(|_, _| Ok(()));

    let handler = contact_handler(5, repo, notifier);
    let ctx = request_context();

    let first = handler.handle_submission(valid_form(), &ctx).await.unwrap();
    let second = handler.handle_submission(valid_form(), &ctx).await.unwrap();

    assert_ne!(first.id, second.id);
}
