use std::{sync::Arc, time::Instant};

use crate::{
    entities::submission::{ContactForm, NewSubmission, RequestContext, SubmissionReceipt},
    errors::AppError,
    limiter::rate_limiter::SlidingWindowLimiter,
    notifiers::Notifier,
    repositories::submission::SubmissionRepository,
    utils::sanitize::contains_suspicious_content,
};

/// Orchestrates a contact-form submission: admission, validation, enrichment,
/// persistence, then best-effort notification. The limiter is process-wide
/// and injected; the collaborators are trait-typed so tests can stand in.
pub struct ContactHandler<R, N>
where
    R: SubmissionRepository,
    N: Notifier,
{
    pub submission_repo: R,
    pub notifier: N,
    limiter: Arc<SlidingWindowLimiter>,
}

impl<R, N> ContactHandler<R, N>
where
    R: SubmissionRepository,
    N: Notifier,
{
    pub fn new(limiter: Arc<SlidingWindowLimiter>, submission_repo: R, notifier: N) -> Self {
        ContactHandler {
            submission_repo,
            notifier,
            limiter,
        }
    }

    /// Handles one submission attempt. Rate-limit denials and validation
    /// failures short-circuit before any side effect; a persistence failure
    /// is fatal to the request; notification failures are logged and
    /// swallowed because the submission is already committed.
    pub async fn handle_submission(
        &self,
        raw: ContactForm,
        ctx: &RequestContext,
    ) -> Result<SubmissionReceipt, AppError> {
        if self.limiter.admit(&ctx.client_addr, Instant::now()).is_denied() {
            tracing::warn!(client = %ctx.client_addr, "rate limit exceeded");
            return Err(AppError::RateLimited);
        }

        let fields = raw.validate()?;

        if [
            fields.name.as_str(),
            fields.message.as_str(),
            fields.subject.as_deref().unwrap_or_default(),
        ]
        .iter()
        .any(|value| contains_suspicious_content(value))
        {
            // Flag only; admission is decided by validation alone.
            tracing::warn!(client = %ctx.client_addr, "suspicious content in submission");
        }

        let submission = NewSubmission::from_fields(fields, ctx);

        let id = self
            .submission_repo
            .save(&submission)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to persist contact submission");
                e
            })?;
        tracing::info!(%id, "contact submission stored");

        // Both emails are issued together and awaited for logging; neither
        // result can fail the request at this point.
        let fields = submission.fields();
        let (confirmation, admin_notice) = tokio::join!(
            self.notifier.send_confirmation(&fields, &id),
            self.notifier.send_admin_notice(&fields, &id),
        );
        if let Err(e) = confirmation {
            tracing::error!(%id, error = %e, "confirmation email failed");
        }
        if let Err(e) = admin_notice {
            tracing::error!(%id, error = %e, "admin notification email failed");
        }

        Ok(SubmissionReceipt { id })
    }
}
