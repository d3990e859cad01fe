use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, notifiers, repositories, routes};
pub use infrastructure::{db, email, limiter, utils};

use db::firestore::FirestoreRepo;
use email::sendgrid::SendGridNotifier;
use limiter::rate_limiter::SlidingWindowLimiter;
use notifiers::Notifier;
use repositories::submission::SubmissionRepository;
use settings::AppConfig;
use use_cases::contact::ContactHandler;

pub struct AppState<R, N>
where
    R: SubmissionRepository,
    N: Notifier,
{
    pub contact_handler: ContactHandler<R, N>,
    pub trust_forwarded_for: bool,
}

pub type AppContactHandler = ContactHandler<FirestoreRepo, SendGridNotifier>;

impl AppState<FirestoreRepo, SendGridNotifier> {
    pub fn new(
        config: &AppConfig,
        limiter: Arc<SlidingWindowLimiter>,
        submission_repo: FirestoreRepo,
    ) -> Self {
        let notifier = SendGridNotifier::new(config);

        AppState {
            contact_handler: ContactHandler::new(limiter, submission_repo, notifier),
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }
}

impl<R, N> AppState<R, N>
where
    R: SubmissionRepository,
    N: Notifier,
{
    /// State over arbitrary collaborators; the integration tests mount mocks
    /// through this.
    pub fn with_handler(contact_handler: ContactHandler<R, N>, trust_forwarded_for: bool) -> Self {
        AppState {
            contact_handler,
            trust_forwarded_for,
        }
    }
}
