use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    entities::submission::ContactFields,
    errors::AppError,
    infrastructure::email::templates,
    notifiers::Notifier,
    settings::AppConfig,
};

/// Transactional email sender backed by the SendGrid v3 mail-send API.
pub struct SendGridNotifier {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    admin_email: String,
    from_email: String,
    company_name: String,
}

impl SendGridNotifier {
    pub fn new(config: &AppConfig) -> Self {
        SendGridNotifier {
            http: reqwest::Client::new(),
            endpoint: config.sendgrid_endpoint.clone(),
            api_key: config.sendgrid_api_key.clone(),
            admin_email: config.admin_email.clone(),
            from_email: config.from_email.clone(),
            company_name: config.company_name.clone(),
        }
    }

    async fn send(&self, context: &str, payload: Value) -> Result<(), AppError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::NotificationError(format!("{context}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_else(|_| String::new());
        Err(AppError::NotificationError(format!(
            "{context}: status {status}: {body}"
        )))
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn send_confirmation(
        &self,
        fields: &ContactFields,
        submission_id: &str,
    ) -> Result<(), AppError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": fields.email }] }],
            "from": { "email": self.from_email, "name": self.company_name },
            "subject": templates::confirmation_subject(&self.company_name),
            "content": [
                {
                    "type": "text/plain",
                    "value": templates::confirmation_text(&self.company_name, fields, submission_id),
                },
                {
                    "type": "text/html",
                    "value": templates::confirmation_html(&self.company_name, fields, submission_id),
                },
            ],
        });

        self.send("confirmation email", payload).await?;
        tracing::info!(to = %fields.email, "confirmation email sent");
        Ok(())
    }

    async fn send_admin_notice(
        &self,
        fields: &ContactFields,
        submission_id: &str,
    ) -> Result<(), AppError> {
        let received = Utc::now();
        let payload = json!({
            "personalizations": [{ "to": [{ "email": self.admin_email }] }],
            "from": { "email": self.from_email, "name": self.company_name },
            "reply_to": { "email": fields.email },
            "subject": templates::notification_subject(fields.subject.as_deref()),
            "content": [
                {
                    "type": "text/plain",
                    "value": templates::notification_text(fields, submission_id, received),
                },
                {
                    "type": "text/html",
                    "value": templates::notification_html(fields, submission_id, received),
                },
            ],
        });

        self.send("admin notification email", payload).await?;
        tracing::info!(to = %self.admin_email, "admin notification email sent");
        Ok(())
    }
}
