use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use prospect_directory::Company;
use serde::{Deserialize, Serialize};

/// One company in the outreach ledger.
///
/// `founder_emails` holds `"; "`-joined addresses. The two flags gate the
/// pipeline stages: harvesting only visits rows with `email_fetched`
/// false, sending only rows with emails and `email_sent` false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub name: String,
    pub slug: String,
    pub profile_url: String,
    pub website: String,
    pub batch: String,
    pub status: String,
    pub industry: String,
    pub location: String,
    pub description: String,
    pub team_size: u32,
    pub first_seen: String,
    pub last_updated: String,
    pub email_fetched: bool,
    pub founder_emails: String,
    pub email_sent: bool,
}

impl LedgerRow {
    fn from_company(company: &Company, now: &str) -> Self {
        Self {
            name: company.name.clone(),
            slug: company.slug.clone(),
            profile_url: company.profile_url.clone(),
            website: company.website.clone(),
            batch: company.batch.clone(),
            status: company.status.clone(),
            industry: company.industry.clone(),
            location: company.all_locations.clone(),
            description: company.one_liner.clone(),
            team_size: company.team_size,
            first_seen: now.to_string(),
            last_updated: now.to_string(),
            email_fetched: false,
            founder_emails: String::new(),
            email_sent: false,
        }
    }

    /// The row's addresses, blanks dropped.
    pub fn emails(&self) -> Vec<String> {
        self.founder_emails
            .split(';')
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Records a harvest result, even an empty one.
    pub fn set_emails(&mut self, emails: &[String]) {
        self.founder_emails = emails.join("; ");
        self.email_fetched = true;
        self.last_updated = now_timestamp();
    }

    pub fn mark_sent(&mut self) {
        self.email_sent = true;
        self.last_updated = now_timestamp();
    }
}

/// The ledger CSV file. Load and save move whole-file snapshots; there is
/// no in-place editing.
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads all rows. A missing file is an empty ledger, not an error.
    pub fn load(&self) -> anyhow::Result<Vec<LedgerRow>> {
        if !self.path.exists() {
            log::info!("No ledger at {} yet, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open ledger {}", self.path.display()))?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        log::info!("Loaded {} ledger rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    /// Rewrites the whole file.
    pub fn save(&self, rows: &[LedgerRow]) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to write ledger {}", self.path.display()))?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Folds freshly fetched companies into `rows`, keyed by slug. Existing
/// rows keep their flags and timestamps. Returns the number of rows added.
pub fn merge_companies(rows: &mut Vec<LedgerRow>, companies: &[Company]) -> usize {
    let mut slugs: HashSet<String> = rows.iter().map(|row| row.slug.clone()).collect();
    let now = now_timestamp();
    let mut added = 0;

    for company in companies {
        if slugs.insert(company.slug.clone()) {
            rows.push(LedgerRow::from_company(company, &now));
            added += 1;
        }
    }

    log::info!(
        "Merged companies: {} new, {} already tracked",
        added,
        companies.len() - added
    );
    added
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
