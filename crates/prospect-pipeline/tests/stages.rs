use std::cell::RefCell;

use prospect_outreach::{Ledger, LedgerRow, Notifier};
use prospect_pipeline::{harvest_rows, send_rows, CampaignConfig, OnError};
use tempfile::TempDir;

fn test_config(dir: &TempDir) -> CampaignConfig {
    CampaignConfig {
        ledger: dir.path().join("ledger.csv"),
        harvest_delay_secs: 0.0,
        send_delay_secs: 0.0,
        save_every: 1,
        ..Default::default()
    }
}

fn row(slug: &str, fetched: bool, emails: &str, sent: bool) -> LedgerRow {
    LedgerRow {
        name: format!("Co {slug}"),
        slug: slug.to_string(),
        profile_url: format!("https://directory.test/{slug}"),
        email_fetched: fetched,
        founder_emails: emails.to_string(),
        email_sent: sent,
        ..Default::default()
    }
}

#[derive(Default)]
struct ScriptedNotifier {
    reject: Vec<&'static str>,
    sent: RefCell<Vec<(String, String)>>,
}

impl Notifier for ScriptedNotifier {
    fn send(&self, to: &str, subject: &str, _body: &str) -> anyhow::Result<String> {
        if self.reject.contains(&to) {
            anyhow::bail!("scripted rejection");
        }
        self.sent.borrow_mut().push((to.to_string(), subject.to_string()));
        Ok(format!("id-{}", self.sent.borrow().len()))
    }
}

#[test]
fn harvest_visits_only_unfetched_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let ledger = Ledger::new(&config.ledger);

    let mut rows = vec![
        row("done", true, "old@done.test", false),
        row("acme", false, "", false),
        row("beta", false, "", false),
    ];

    let visited = RefCell::new(Vec::new());
    let summary = harvest_rows(&config, &ledger, &mut rows, |url| {
        visited.borrow_mut().push(url.to_string());
        if url.ends_with("/acme") {
            Ok(vec!["jane@acme.test".to_string(), "team@acme.test".to_string()])
        } else {
            Ok(Vec::new())
        }
    })
    .unwrap();

    assert_eq!(2, summary.visited);
    assert_eq!(1, summary.with_emails);
    assert_eq!(0, summary.failed);
    assert_eq!(
        vec!["https://directory.test/acme", "https://directory.test/beta"],
        *visited.borrow()
    );

    assert_eq!("jane@acme.test; team@acme.test", rows[1].founder_emails);
    assert!(rows[1].email_fetched);
    // Mined but empty still counts as fetched.
    assert!(rows[2].email_fetched);
    assert!(rows[2].founder_emails.is_empty());
    // Untouched row kept its state.
    assert_eq!("old@done.test", rows[0].founder_emails);

    let reloaded = ledger.load().unwrap();
    assert_eq!(rows, reloaded);
}

#[test]
fn harvest_skip_and_log_leaves_failed_rows_unfetched() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let ledger = Ledger::new(&config.ledger);

    let mut rows = vec![row("acme", false, "", false), row("beta", false, "", false)];

    let summary = harvest_rows(&config, &ledger, &mut rows, |url| {
        if url.ends_with("/acme") {
            anyhow::bail!("503 from upstream")
        }
        Ok(vec!["x@beta.test".to_string()])
    })
    .unwrap();

    assert_eq!(2, summary.visited);
    assert_eq!(1, summary.failed);
    assert_eq!(1, summary.with_emails);
    // The failed row will be retried on the next run.
    assert!(!rows[0].email_fetched);
    assert!(rows[1].email_fetched);
}

#[test]
fn harvest_fail_policy_stops_at_first_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.on_harvest_error = OnError::Fail;
    let ledger = Ledger::new(&config.ledger);

    let mut rows = vec![row("acme", false, "", false), row("beta", false, "", false)];

    let calls = RefCell::new(0);
    let result = harvest_rows(&config, &ledger, &mut rows, |_url| {
        *calls.borrow_mut() += 1;
        anyhow::bail!("boom")
    });

    assert!(result.is_err());
    assert_eq!(1, *calls.borrow());
    // Progress made so far still hit the disk.
    let reloaded = ledger.load().unwrap();
    assert_eq!(2, reloaded.len());
    assert!(!reloaded[0].email_fetched);
}

#[test]
fn send_targets_pending_rows_and_marks_them() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.outreach.message.subject = "for {founder_name}".to_string();
    let ledger = Ledger::new(&config.ledger);

    let mut rows = vec![
        row("acme", true, "jane@acme.test; not-an-address; team@acme.test", false),
        row("empty", true, "", false),
        row("sent", true, "x@sent.test", true),
    ];

    let notifier = ScriptedNotifier::default();
    let summary = send_rows(&config, &ledger, &mut rows, &notifier).unwrap();

    assert_eq!(2, summary.sent);
    assert_eq!(0, summary.failed);
    assert_eq!(1, summary.companies);

    let sent = notifier.sent.borrow();
    assert_eq!(
        vec![
            ("jane@acme.test".to_string(), "for Jane".to_string()),
            ("team@acme.test".to_string(), "for Co acme team".to_string()),
        ],
        *sent
    );

    assert!(rows[0].email_sent);
    assert!(!rows[1].email_sent);
    let reloaded = ledger.load().unwrap();
    assert_eq!(rows, reloaded);
}

#[test]
fn send_skip_and_log_still_marks_partially_delivered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let ledger = Ledger::new(&config.ledger);

    let mut rows = vec![row("acme", true, "bad@acme.test; ok@acme.test", false)];

    let notifier = ScriptedNotifier {
        reject: vec!["bad@acme.test"],
        ..Default::default()
    };
    let summary = send_rows(&config, &ledger, &mut rows, &notifier).unwrap();

    assert_eq!(1, summary.sent);
    assert_eq!(1, summary.failed);
    assert_eq!(1, summary.companies);
    assert!(rows[0].email_sent);
}

#[test]
fn send_fail_policy_aborts_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.on_send_error = OnError::Fail;
    let ledger = Ledger::new(&config.ledger);

    let mut rows = vec![row("acme", true, "bad@acme.test; ok@acme.test", false)];

    let notifier = ScriptedNotifier {
        reject: vec!["bad@acme.test"],
        ..Default::default()
    };
    let result = send_rows(&config, &ledger, &mut rows, &notifier);

    assert!(result.is_err());
    assert!(notifier.sent.borrow().is_empty());
    let reloaded = ledger.load().unwrap();
    assert!(!reloaded[0].email_sent);
}

#[test]
fn send_fail_policy_keeps_delivered_rows_marked() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.on_send_error = OnError::Fail;
    let ledger = Ledger::new(&config.ledger);

    // First address goes through, the second one aborts the stage.
    let mut rows = vec![row("acme", true, "ok@acme.test; bad@acme.test", false)];

    let notifier = ScriptedNotifier {
        reject: vec!["bad@acme.test"],
        ..Default::default()
    };
    let result = send_rows(&config, &ledger, &mut rows, &notifier);

    assert!(result.is_err());
    assert_eq!(1, notifier.sent.borrow().len());
    // The delivery survives the abort, so a rerun skips the row instead
    // of emailing ok@acme.test a second time.
    let reloaded = ledger.load().unwrap();
    assert!(reloaded[0].email_sent);
}

#[test]
fn send_with_nothing_pending_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let ledger = Ledger::new(&config.ledger);

    let mut rows = vec![row("sent", true, "x@sent.test", true), row("empty", true, "", false)];

    let notifier = ScriptedNotifier::default();
    let summary = send_rows(&config, &ledger, &mut rows, &notifier).unwrap();

    assert_eq!(0, summary.sent);
    assert_eq!(0, summary.companies);
    assert!(notifier.sent.borrow().is_empty());
}
