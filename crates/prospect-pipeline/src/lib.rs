mod campaign;
mod config;

pub use campaign::{
    fetch, harvest, harvest_rows, run, send, send_rows, CampaignReport, FetchSummary,
    HarvestSummary, SendSummary,
};
pub use config::{CampaignConfig, OnError};

pub use anyhow;
