use async_trait::async_trait;

use crate::{
    entities::submission::{NewSubmission, Submission, SubmissionStatus},
    errors::AppError,
};

/// Document-store operations for contact submissions. The store assigns ids;
/// a submission is immutable once saved apart from its status and the
/// `updated_at` stamp written alongside a status change.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn save(&self, submission: &NewSubmission) -> Result<String, AppError>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Submission>, AppError>;
    async fn update_status(&self, id: &str, status: SubmissionStatus) -> Result<(), AppError>;
    async fn list_recent(
        &self,
        limit: usize,
        start_after: Option<String>,
    ) -> Result<Vec<Submission>, AppError>;
    async fn count_by_status(&self, status: SubmissionStatus) -> Result<u64, AppError>;
    async fn delete_older_than(&self, days: u32) -> Result<u64, AppError>;
}
