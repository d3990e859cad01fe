use chrono::{DateTime, Utc};
use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, FieldError};

/// Mailbox grammar: local part, "@", domain with at least one dotted label.
/// Deliverability is not checked here.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile")
});

pub const NAME_MAX_LEN: usize = 100;
pub const MESSAGE_MIN_LEN: usize = 10;
pub const MESSAGE_MAX_LEN: usize = 1000;
pub const SUBJECT_MAX_LEN: usize = 200;

/// Raw contact form as it arrives over the wire. Every field is optional so
/// that missing fields surface as field errors rather than deserialization
/// failures; unknown fields are dropped by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub subject: Option<String>,
}

/// Trimmed, validated form fields. Only constructed through
/// [`ContactForm::validate`]; an empty subject is normalized to `None`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: Option<String>,
}

impl ContactForm {
    /// Validates and normalizes the form. Errors are collected exhaustively,
    /// one entry per violated rule, in field declaration order.
    pub fn validate(self) -> Result<ContactFields, AppError> {
        let mut errors = Vec::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        } else if name.chars().count() > NAME_MAX_LEN {
            errors.push(FieldError::new(
                "name",
                "Name must be less than 100 characters",
            ));
        }

        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !EMAIL_RE.is_match(email) {
            errors.push(FieldError::new(
                "email",
                "Please provide a valid email address",
            ));
        }

        let message = self.message.as_deref().map(str::trim).unwrap_or_default();
        if message.is_empty() {
            errors.push(FieldError::new("message", "Message is required"));
        } else if message.chars().count() < MESSAGE_MIN_LEN {
            errors.push(FieldError::new(
                "message",
                "Message must be at least 10 characters long",
            ));
        } else if message.chars().count() > MESSAGE_MAX_LEN {
            errors.push(FieldError::new(
                "message",
                "Message must be less than 1000 characters",
            ));
        }

        let subject = self.subject.as_deref().map(str::trim).unwrap_or_default();
        if subject.chars().count() > SUBJECT_MAX_LEN {
            errors.push(FieldError::new(
                "subject",
                "Subject must be less than 200 characters",
            ));
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        Ok(ContactFields {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            subject: (!subject.is_empty()).then(|| subject.to_string()),
        })
    }
}

/// Request-scoped facts attached to a submission by the pipeline, never taken
/// from the client-supplied body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub client_addr: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionMetadata {
    pub ip_address: String,
    pub user_agent: String,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[display("new")]
    New,
    #[display("read")]
    Read,
    #[display("responded")]
    Responded,
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(SubmissionStatus::New),
            "read" => Ok(SubmissionStatus::Read),
            "responded" => Ok(SubmissionStatus::Responded),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// A submission ready for persistence. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub metadata: SubmissionMetadata,
    pub status: SubmissionStatus,
}

impl NewSubmission {
    pub fn from_fields(fields: ContactFields, ctx: &RequestContext) -> Self {
        NewSubmission {
            name: fields.name,
            email: fields.email,
            message: fields.message,
            subject: fields.subject,
            timestamp: Utc::now(),
            metadata: SubmissionMetadata {
                ip_address: ctx.client_addr.clone(),
                user_agent: ctx.user_agent.clone(),
                source: "api".to_string(),
            },
            status: SubmissionStatus::New,
        }
    }

    pub fn fields(&self) -> ContactFields {
        ContactFields {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
            subject: self.subject.clone(),
        }
    }
}

/// A persisted submission. Immutable apart from `status` and the `updated_at`
/// stamp set on status change.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Submission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub metadata: SubmissionMetadata,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Returned by the pipeline on success; serialized into the envelope's `data`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionReceipt {
    pub id: String,
}
