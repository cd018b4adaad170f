use std::path::{Path, PathBuf};

use fs_err as fs;
use prospect_directory::{DirectoryConfig, PageConfig};
use prospect_outreach::OutreachConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignConfig {
    /// Directory URL whose query string selects the companies to target.
    /// An empty or filter-less URL selects every company.
    #[serde(default = "default_filter_url")]
    pub filter_url: String,

    /// The outreach ledger CSV.
    #[serde(default = "default_ledger")]
    pub ledger: PathBuf,

    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub pages: PageConfig,

    #[serde(default)]
    pub outreach: OutreachConfig,

    /// Seconds to sleep between profile-page fetches.
    #[serde(default = "default_harvest_delay_secs")]
    pub harvest_delay_secs: f32,

    /// Seconds to sleep between sent emails.
    #[serde(default = "default_send_delay_secs")]
    pub send_delay_secs: f32,

    /// Save the ledger every this many processed items, on top of the
    /// save at the end of each stage. Zero disables intermediate saves.
    #[serde(default = "default_save_every")]
    pub save_every: usize,

    #[serde(default = "default_on_harvest_error")]
    pub on_harvest_error: OnError,

    #[serde(default = "default_on_send_error")]
    pub on_send_error: OnError,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            filter_url: default_filter_url(),
            ledger: default_ledger(),
            directory: DirectoryConfig::default(),
            pages: PageConfig::default(),
            outreach: OutreachConfig::default(),
            harvest_delay_secs: default_harvest_delay_secs(),
            send_delay_secs: default_send_delay_secs(),
            save_every: default_save_every(),
            on_harvest_error: default_on_harvest_error(),
            on_send_error: default_on_send_error(),
        }
    }
}

impl CampaignConfig {
    /// Reads a YAML campaign file. Missing keys keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let conf = serde_yaml::from_str(&fs::read_to_string(path.as_ref())?)?;
        Ok(conf)
    }
}

fn default_filter_url() -> String {
    String::new()
}

fn default_ledger() -> PathBuf {
    PathBuf::from("companies.csv")
}

fn default_harvest_delay_secs() -> f32 {
    1.0
}

fn default_send_delay_secs() -> f32 {
    5.0
}

fn default_save_every() -> usize {
    10
}

fn default_on_harvest_error() -> OnError {
    OnError::SkipAndLog
}

fn default_on_send_error() -> OnError {
    OnError::SkipAndLog
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnError {
    Fail,
    SkipAndLog,
}
