use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};

use crate::{
    entities::submission::{NewSubmission, Submission, SubmissionMetadata, SubmissionStatus},
    errors::AppError,
    repositories::submission::SubmissionRepository,
    settings::AppConfig,
};

/// Contact-submission store backed by the Firestore REST v1 API.
///
/// Documents live under a single collection; Firestore assigns document ids
/// on create. Authentication is a configured bearer token; acquiring tokens
/// is the deployment's concern, not this client's.
#[derive(Clone)]
pub struct FirestoreRepo {
    http: reqwest::Client,
    documents_url: String,
    documents_path: String,
    collection: String,
    auth_token: Option<String>,
}

impl FirestoreRepo {
    pub fn new(config: &AppConfig) -> Self {
        let documents_path = format!(
            "projects/{}/databases/(default)/documents",
            config.gcp_project_id,
        );
        FirestoreRepo {
            http: reqwest::Client::new(),
            documents_url: format!(
                "{}/{}",
                config.firestore_endpoint.trim_end_matches('/'),
                documents_path,
            ),
            documents_path,
            collection: config.firestore_collection.clone(),
            auth_token: config.firestore_auth_token.clone(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.documents_url, self.collection)
    }

    /// Full resource name of a document, as carried by reference values.
    fn document_name(&self, id: &str) -> String {
        format!("{}/{}/{}", self.documents_path, self.collection, id)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), urlencoding::encode(id))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn run_query(&self, structured_query: Value) -> Result<Vec<Value>, AppError> {
        let response = self
            .authorize(self.http.post(format!("{}:runQuery", self.documents_url)))
            .json(&json!({ "structuredQuery": structured_query }))
            .send()
            .await
            .map_err(|e| storage_err("firestore query request failed", e))?;

        let response = expect_success("firestore query", response).await?;
        let results: Vec<Value> = response
            .json()
            .await
            .map_err(|e| storage_err("firestore query response unreadable", e))?;

        // runQuery interleaves read-time markers with documents.
        Ok(results
            .into_iter()
            .filter_map(|mut entry| entry.get_mut("document").map(Value::take))
            .collect())
    }
}

#[async_trait]
impl SubmissionRepository for FirestoreRepo {
    async fn save(&self, submission: &NewSubmission) -> Result<String, AppError> {
        let response = self
            .authorize(self.http.post(self.collection_url()))
            .json(&json!({ "fields": encode_fields(submission) }))
            .send()
            .await
            .map_err(|e| storage_err("firestore create request failed", e))?;

        let response = expect_success("firestore create", response).await?;
        let document: Value = response
            .json()
            .await
            .map_err(|e| storage_err("firestore create response unreadable", e))?;

        document_id(&document)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Submission>, AppError> {
        let response = self
            .authorize(self.http.get(self.document_url(id)))
            .send()
            .await
            .map_err(|e| storage_err("firestore get request failed", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = expect_success("firestore get", response).await?;
        let document: Value = response
            .json()
            .await
            .map_err(|e| storage_err("firestore get response unreadable", e))?;

        decode_document(&document).map(Some)
    }

    async fn update_status(&self, id: &str, status: SubmissionStatus) -> Result<(), AppError> {
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let response = self
            .authorize(self.http.patch(format!(
                "{}?updateMask.fieldPaths=status&updateMask.fieldPaths=updatedAt\
                 &currentDocument.exists=true",
                self.document_url(id)
            )))
            .json(&json!({
                "fields": {
                    "status": { "stringValue": status.to_string() },
                    "updatedAt": { "timestampValue": updated_at },
                }
            }))
            .send()
            .await
            .map_err(|e| storage_err("firestore update request failed", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Submission {id} not found")));
        }
        expect_success("firestore update", response).await?;
        Ok(())
    }

    async fn list_recent(
        &self,
        limit: usize,
        start_after: Option<String>,
    ) -> Result<Vec<Submission>, AppError> {
        // `__name__` breaks timestamp ties so pages never skip or repeat a
        // document.
        let mut query = json!({
            "from": [{ "collectionId": self.collection }],
            "orderBy": [
                { "field": { "fieldPath": "timestamp" }, "direction": "DESCENDING" },
                { "field": { "fieldPath": "__name__" }, "direction": "DESCENDING" },
            ],
            "limit": limit,
        });

        if let Some(cursor_id) = start_after.as_deref() {
            let cursor = self.get_by_id(cursor_id).await?.ok_or_else(|| {
                AppError::NotFound(format!("Cursor submission {cursor_id} not found"))
            })?;
            query["startAt"] = json!({
                "values": [
                    {
                        "timestampValue": cursor
                            .timestamp
                            .to_rfc3339_opts(SecondsFormat::Micros, true)
                    },
                    { "referenceValue": self.document_name(cursor_id) },
                ],
                "before": false,
            });
        }

        self.run_query(query)
            .await?
            .iter()
            .map(decode_document)
            .collect()
    }

    async fn count_by_status(&self, status: SubmissionStatus) -> Result<u64, AppError> {
        let documents = self
            .run_query(json!({
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "status" },
                        "op": "EQUAL",
                        "value": { "stringValue": status.to_string() },
                    }
                },
            }))
            .await?;

        Ok(documents.len() as u64)
    }

    async fn delete_older_than(&self, days: u32) -> Result<u64, AppError> {
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let documents = self
            .run_query(json!({
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "timestamp" },
                        "op": "LESS_THAN",
                        "value": {
                            "timestampValue": cutoff.to_rfc3339_opts(SecondsFormat::Micros, true)
                        },
                    }
                },
            }))
            .await?;

        let mut deleted = 0;
        for document in &documents {
            let id = document_id(document)?;
            let response = self
                .authorize(self.http.delete(self.document_url(&id)))
                .send()
                .await
                .map_err(|e| storage_err("firestore delete request failed", e))?;
            expect_success("firestore delete", response).await?;
            deleted += 1;
        }
        Ok(deleted)
    }
}

fn storage_err(context: &str, cause: impl std::fmt::Display) -> AppError {
    AppError::StorageError(format!("{context}: {cause}"))
}

async fn expect_success(
    context: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_else(|_| String::new());
    Err(AppError::StorageError(format!(
        "{context}: status {status}: {body}"
    )))
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

/// Encodes a submission into Firestore's typed-value field map. The optional
/// subject is omitted entirely when absent.
fn encode_fields(submission: &NewSubmission) -> Value {
    let mut fields = Map::new();
    fields.insert("name".into(), string_value(&submission.name));
    fields.insert("email".into(), string_value(&submission.email));
    fields.insert("message".into(), string_value(&submission.message));
    if let Some(subject) = &submission.subject {
        fields.insert("subject".into(), string_value(subject));
    }
    fields.insert(
        "timestamp".into(),
        json!({
            "timestampValue": submission
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Micros, true)
        }),
    );
    fields.insert(
        "metadata".into(),
        json!({
            "mapValue": {
                "fields": {
                    "ip_address": string_value(&submission.metadata.ip_address),
                    "user_agent": string_value(&submission.metadata.user_agent),
                    "source": string_value(&submission.metadata.source),
                }
            }
        }),
    );
    fields.insert("status".into(), string_value(&submission.status.to_string()));
    Value::Object(fields)
}

fn document_id(document: &Value) -> Result<String, AppError> {
    document["name"]
        .as_str()
        .and_then(|name| name.rsplit('/').next())
        .map(str::to_string)
        .ok_or_else(|| AppError::StorageError("firestore document has no name".into()))
}

fn str_field(fields: &Value, name: &str) -> Result<String, AppError> {
    fields[name]["stringValue"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::StorageError(format!("firestore document missing field {name}")))
}

fn timestamp_field(fields: &Value, name: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = fields[name]["timestampValue"].as_str().ok_or_else(|| {
        AppError::StorageError(format!("firestore document missing field {name}"))
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| storage_err("firestore timestamp unparseable", e))
}

fn decode_document(document: &Value) -> Result<Submission, AppError> {
    let id = document_id(document)?;
    let fields = &document["fields"];
    let metadata = &fields["metadata"]["mapValue"]["fields"];

    let status = str_field(fields, "status")?
        .parse::<SubmissionStatus>()
        .map_err(AppError::StorageError)?;

    let updated_at = match fields.get("updatedAt") {
        Some(_) => Some(timestamp_field(fields, "updatedAt")?),
        None => None,
    };

    Ok(Submission {
        id,
        name: str_field(fields, "name")?,
        email: str_field(fields, "email")?,
        message: str_field(fields, "message")?,
        subject: fields["subject"]["stringValue"].as_str().map(str::to_string),
        timestamp: timestamp_field(fields, "timestamp")?,
        metadata: SubmissionMetadata {
            ip_address: str_field(metadata, "ip_address")?,
            user_agent: str_field(metadata, "user_agent")?,
            source: str_field(metadata, "source")?,
        },
        status,
        updated_at,
    })
}
