use config::{Config, ConfigError, Environment, File};
use dotenv::dotenv;
use serde::Deserialize;
use std::{env, fmt, str::FromStr, time::Duration};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub gcp_project_id: String,

    #[serde(default = "default_collection")]
    pub firestore_collection: String,

    #[serde(default = "default_firestore_endpoint")]
    pub firestore_endpoint: String,

    #[serde(default)]
    pub firestore_auth_token: Option<String>,

    #[serde(default)]
    pub sendgrid_api_key: String,

    #[serde(default = "default_sendgrid_endpoint")]
    pub sendgrid_endpoint: String,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_company_name")]
    pub company_name: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub trust_forwarded_for: bool,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: usize,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Contact-Form-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_collection() -> String {
    "contact_submissions".to_string()
}
fn default_firestore_endpoint() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}
fn default_sendgrid_endpoint() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}
fn default_admin_email() -> String {
    "admin@yourcompany.com".to_string()
}
fn default_from_email() -> String {
    "noreply@yourcompany.com".to_string()
}
fn default_company_name() -> String {
    "Your Company".to_string()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_rate_limit_max_requests() -> usize {
    5
}
fn default_rate_limit_window_secs() -> u64 {
    15 * 60
}
fn default_retention_days() -> u32 {
    365
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!("config/{}", env_name.to_string().to_lowercase()))
                    .required(false),
            )
            .add_source(Environment::with_prefix("APP").separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject critical env values if missing
        config.gcp_project_id = fill_or_env(config.gcp_project_id, "GCP_PROJECT_ID")?;
        config.sendgrid_api_key = fill_or_env(config.sendgrid_api_key, "SENDGRID_API_KEY")?;
        config.admin_email = fill_or_env(config.admin_email, "ADMIN_EMAIL")?;

        if config.firestore_auth_token.is_none() {
            config.firestore_auth_token = env::var("FIRESTORE_AUTH_TOKEN").ok();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.gcp_project_id.trim().is_empty() {
            errors.push("GCP_PROJECT_ID cannot be empty");
        }
        if self.sendgrid_api_key.trim().is_empty() {
            errors.push("SENDGRID_API_KEY cannot be empty");
        }
        if !self.admin_email.contains('@') {
            errors.push("ADMIN_EMAIL must be a mailbox address");
        }
        if self.rate_limit_max_requests == 0 {
            errors.push("rate_limit_max_requests must be at least 1");
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("rate_limit_window_secs must be at least 1");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("gcp_project_id", &self.gcp_project_id)
            .field("firestore_collection", &self.firestore_collection)
            .field("firestore_endpoint", &self.firestore_endpoint)
            .field(
                "firestore_auth_token",
                &self.firestore_auth_token.as_deref().unwrap_or("").redact(),
            )
            .field("sendgrid_api_key", &self.sendgrid_api_key.redact())
            .field("sendgrid_endpoint", &self.sendgrid_endpoint)
            .field("admin_email", &self.admin_email)
            .field("from_email", &self.from_email)
            .field("company_name", &self.company_name)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("retention_days", &self.retention_days)
            .finish()
    }
}
