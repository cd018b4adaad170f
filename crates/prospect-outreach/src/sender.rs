use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::message::{encode_message, MessageTemplate};

/// Environment variable holding the mail API bearer token. Takes
/// precedence over `tokenFile`.
pub const TOKEN_ENV_VAR: &str = "GMAIL_ACCESS_TOKEN";

const SEND_ENDPOINT: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachConfig {
    #[serde(default)]
    pub message: MessageTemplate,

    /// File holding an already-issued bearer token, read when
    /// [`TOKEN_ENV_VAR`] is unset. Obtaining or refreshing tokens happens
    /// elsewhere.
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            message: MessageTemplate::default(),
            token_file: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Delivers one rendered message to one address.
pub trait Notifier {
    /// Returns the provider's id for the accepted message.
    fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<String>;
}

/// Sends through the Gmail REST API with a pre-issued bearer token.
pub struct GmailSender {
    client: reqwest::blocking::Client,
    token: String,
}

impl GmailSender {
    pub fn new(config: &OutreachConfig) -> anyhow::Result<Self> {
        let token = resolve_token(config)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, token })
    }
}

impl Notifier for GmailSender {
    fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<String> {
        let raw = encode_message(to, subject, body);
        let resp: serde_json::Value = self
            .client
            .post(SEND_ENDPOINT)
            .bearer_auth(&self.token)
            .json(&json!({ "raw": raw }))
            .send()?
            .error_for_status()?
            .json()?;
        resp["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Mail API response carries no message id: {resp}"))
    }
}

fn resolve_token(config: &OutreachConfig) -> anyhow::Result<String> {
    token_from(env::var(TOKEN_ENV_VAR).ok().as_deref(), config)
}

fn token_from(env_token: Option<&str>, config: &OutreachConfig) -> anyhow::Result<String> {
    if let Some(token) = env_token {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }
    match &config.token_file {
        Some(path) => {
            let token = fs::read_to_string(path)?;
            let token = token.trim();
            if token.is_empty() {
                bail!("Token file {} is empty", path.display());
            }
            Ok(token.to_string())
        }
        None => bail!("No mail token: set {TOKEN_ENV_VAR} or configure tokenFile"),
    }
}

/// Logs instead of sending. Stands in for [`GmailSender`] in previews and
/// tests.
#[derive(Debug, Default)]
pub struct DryRunSender;

impl Notifier for DryRunSender {
    fn send(&self, to: &str, subject: &str, _body: &str) -> anyhow::Result<String> {
        log::info!("[dry-run] would send {subject:?} to {to}");
        Ok(format!("dry-run-{to}"))
    }
}
