use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use prospect_directory::{DirectoryClient, PageClient};
use prospect_filter::{filter_all, parse_filters};
use prospect_outreach::{founder_name, merge_companies, Ledger, LedgerRow, Notifier};

use crate::config::{CampaignConfig, OnError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Records in the downloaded dataset.
    pub fetched: usize,
    /// Records matching the filters.
    pub matched: usize,
    /// New ledger rows.
    pub added: usize,
    /// Ledger rows after the merge.
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Rows whose page was attempted.
    pub visited: usize,
    /// Rows that yielded at least one address.
    pub with_emails: usize,
    /// Rows whose page fetch failed and was skipped.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSummary {
    /// Messages accepted by the notifier.
    pub sent: usize,
    /// Messages the notifier rejected.
    pub failed: usize,
    /// Rows marked sent (at least one delivery went through).
    pub companies: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignReport {
    pub fetch: FetchSummary,
    pub harvest: HarvestSummary,
    pub send: Option<SendSummary>,
}

/// Fetch stage: download the dataset, filter it against the campaign URL
/// and fold the matches into the ledger.
pub fn fetch(config: &CampaignConfig) -> anyhow::Result<FetchSummary> {
    let filters = parse_filters(&config.filter_url);
    if filters.is_empty() {
        log::warn!(
            "No filters found in {:?}, every company matches",
            config.filter_url
        );
    } else if let Ok(active) = serde_json::to_string(&filters) {
        log::info!("Active filters: {active}");
    }

    let client = DirectoryClient::new(&config.directory)?;
    let companies = client.fetch_all()?;
    let fetched = companies.len();

    let matching = filter_all(companies, &filters);
    let matched = matching.len();
    log::info!("{matched} of {fetched} companies match");

    let ledger = Ledger::new(&config.ledger);
    let mut rows = ledger.load()?;
    let added = merge_companies(&mut rows, &matching);
    let total = rows.len();
    ledger.save(&rows)?;

    Ok(FetchSummary {
        fetched,
        matched,
        added,
        total,
    })
}

/// Harvest stage: visit the profile page of every unfetched row.
pub fn harvest(config: &CampaignConfig) -> anyhow::Result<HarvestSummary> {
    let client = PageClient::new(&config.pages)?;
    let ledger = Ledger::new(&config.ledger);
    let mut rows = ledger.load()?;
    harvest_rows(config, &ledger, &mut rows, |url| client.harvest(url))
}

/// Harvest over `rows`, visiting pages through `fetch_emails`.
///
/// Rows already marked fetched are left alone. A row is marked fetched
/// when its page was mined, even when nothing was found; a failed page
/// stays unfetched so a later run retries it. The ledger is saved every
/// `save_every` visits and once at the end.
pub fn harvest_rows(
    config: &CampaignConfig,
    ledger: &Ledger,
    rows: &mut Vec<LedgerRow>,
    mut fetch_emails: impl FnMut(&str) -> anyhow::Result<Vec<String>>,
) -> anyhow::Result<HarvestSummary> {
    let pending: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.email_fetched)
        .map(|(i, _)| i)
        .collect();
    log::info!("Harvesting emails for {} companies", pending.len());

    let mut summary = HarvestSummary::default();
    for (done, &i) in pending.iter().enumerate() {
        let url = rows[i].profile_url.clone();
        log::info!("[{}/{}] {}", done + 1, pending.len(), rows[i].name);

        match fetch_emails(&url) {
            Ok(emails) => {
                if !emails.is_empty() {
                    summary.with_emails += 1;
                }
                rows[i].set_emails(&emails);
            }
            Err(e) => match config.on_harvest_error {
                OnError::SkipAndLog => {
                    log::warn!("Skipping page {url} got: {e}");
                    summary.failed += 1;
                }
                OnError::Fail => {
                    ledger.save(rows)?;
                    return Err(anyhow!("Couldn't harvest {url} got: {e}"));
                }
            },
        }
        summary.visited += 1;

        if config.save_every > 0 && summary.visited % config.save_every == 0 {
            ledger.save(rows)?;
            log::info!("Progress saved after {} companies", summary.visited);
        }
        sleep_secs(config.harvest_delay_secs);
    }

    ledger.save(rows)?;
    Ok(summary)
}

/// Send stage: deliver the templated message to every harvested address.
pub fn send(config: &CampaignConfig, notifier: &dyn Notifier) -> anyhow::Result<SendSummary> {
    let ledger = Ledger::new(&config.ledger);
    let mut rows = ledger.load()?;
    send_rows(config, &ledger, &mut rows, notifier)
}

/// Send over `rows` through `notifier`.
///
/// Targets rows that hold addresses and are not marked sent. Entries
/// without an `@` are skipped outright. A row is marked sent the moment
/// its first address goes through, so an aborted or interrupted run never
/// re-emails a contacted address.
pub fn send_rows(
    config: &CampaignConfig,
    ledger: &Ledger,
    rows: &mut Vec<LedgerRow>,
    notifier: &dyn Notifier,
) -> anyhow::Result<SendSummary> {
    let template = &config.outreach.message;
    let pending: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.email_sent && !row.emails().is_empty())
        .map(|(i, _)| i)
        .collect();

    let planned: usize = pending.iter().map(|&i| rows[i].emails().len()).sum();
    log::info!(
        "Sending to {planned} addresses across {} companies",
        pending.len()
    );

    let mut summary = SendSummary::default();
    let mut processed = 0;
    for &i in &pending {
        let name = rows[i].name.clone();
        let mut delivered = false;

        for email in rows[i].emails() {
            if !email.contains('@') {
                continue;
            }
            let greeting = founder_name(&name, &email);
            let (subject, body) = template.render(&greeting);

            match notifier.send(&email, &subject, &body) {
                Ok(id) => {
                    log::info!("Sent to {email} (Hi {greeting}), id {id}");
                    summary.sent += 1;
                    // Mark the row on the first delivery, so every save
                    // after this point persists it.
                    if !delivered {
                        rows[i].mark_sent();
                        summary.companies += 1;
                        delivered = true;
                    }
                }
                Err(e) => match config.on_send_error {
                    OnError::SkipAndLog => {
                        log::warn!("Skipping send to {email} got: {e}");
                        summary.failed += 1;
                    }
                    OnError::Fail => {
                        ledger.save(rows)?;
                        return Err(anyhow!("Couldn't send to {email} got: {e}"));
                    }
                },
            }
            processed += 1;

            if config.save_every > 0 && processed % config.save_every == 0 {
                ledger.save(rows)?;
                log::info!("Progress saved after {processed} emails");
            }
            sleep_secs(config.send_delay_secs);
        }
    }

    ledger.save(rows)?;
    Ok(summary)
}

/// The whole campaign: fetch, harvest, then send when a notifier is given.
pub fn run(
    config: &CampaignConfig,
    notifier: Option<&dyn Notifier>,
) -> anyhow::Result<CampaignReport> {
    let fetched = fetch(config)?;
    let harvested = harvest(config)?;
    let sent = match notifier {
        Some(notifier) => Some(send(config, notifier)?),
        None => None,
    };
    Ok(CampaignReport {
        fetch: fetched,
        harvest: harvested,
        send: sent,
    })
}

fn sleep_secs(secs: f32) {
    if secs.is_finite() && secs > 0.0 {
        thread::sleep(Duration::from_secs_f32(secs));
    }
}
