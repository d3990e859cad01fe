use async_trait::async_trait;

use crate::{entities::submission::ContactFields, errors::AppError};

/// Outbound email operations for an accepted submission. Both sends are
/// best-effort from the pipeline's point of view: failures are logged by the
/// caller and never change the request outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Confirmation to the submitter, referencing the stored submission id.
    async fn send_confirmation(
        &self,
        fields: &ContactFields,
        submission_id: &str,
    ) -> Result<(), AppError>;

    /// Notification to the administrator with the full submission content.
    async fn send_admin_notice(
        &self,
        fields: &ContactFields,
        submission_id: &str,
    ) -> Result<(), AppError>;
}
