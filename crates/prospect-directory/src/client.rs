use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::company::Company;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    String::from("https://yc-oss.github.io/api/companies/all.json")
}

fn default_user_agent() -> String {
    String::from("prospect")
}

fn default_timeout_secs() -> u64 {
    30
}

/// Read-only client for the companies dataset.
pub struct DirectoryClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl DirectoryClient {
    pub fn new(config: &DirectoryConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Downloads the whole dataset. The dump is a single JSON array, a few
    /// megabytes compressed; there is no paging.
    pub fn fetch_all(&self) -> anyhow::Result<Vec<Company>> {
        log::info!("Fetching companies from {}", self.endpoint);
        let companies: Vec<Company> = self
            .client
            .get(&self.endpoint)
            .send()?
            .error_for_status()?
            .json()?;
        log::info!("Fetched {} companies", companies.len());
        Ok(companies)
    }
}
