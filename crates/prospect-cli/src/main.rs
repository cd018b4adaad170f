use std::io;
use std::path::PathBuf;

use anyhow::bail;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use env_logger::Env;
use prospect_directory::PageClient;
use prospect_filter::parse_filters;
use prospect_outreach::{founder_name, DryRunSender, GmailSender, Notifier};
use prospect_pipeline::{CampaignConfig, OnError};

/// Company outreach pipeline
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[clap(name = "fetch")]
    Fetch(FetchArgs),
    #[clap(name = "harvest")]
    Harvest(HarvestArgs),
    #[clap(name = "send")]
    Send(SendArgs),
    #[clap(name = "run")]
    Run(RunArgs),
    #[clap(name = "filters")]
    Filters(FiltersArgs),
    #[clap(hide = true)]
    Completion,
}

/// Options shared by the campaign stages
#[derive(Debug, clap::Args)]
pub struct CampaignArgs {
    /// Optional campaign yaml configuration file
    #[clap(env = "PROSPECT_CONFIG", long, short)]
    pub config: Option<PathBuf>,
    /// Override the directory URL whose query string selects companies
    #[clap(long)]
    pub filter_url: Option<String>,
    /// Override the outreach ledger CSV path
    #[clap(long)]
    pub ledger: Option<PathBuf>,
    /// Override the seconds slept between profile-page fetches
    #[clap(long)]
    pub harvest_delay: Option<f32>,
    /// Override the seconds slept between sent emails
    #[clap(long)]
    pub send_delay: Option<f32>,
    /// Override how many processed items trigger a mid-stage ledger save
    #[clap(long)]
    pub save_every: Option<usize>,
    /// Override the page error handling strategy
    #[clap(value_enum, long)]
    pub on_harvest_error: Option<OnError>,
    /// Override the delivery error handling strategy
    #[clap(value_enum, long)]
    pub on_send_error: Option<OnError>,
    /// When quiet no logs are outputted
    #[clap(long, short)]
    pub quiet: bool,
}

impl TryFrom<&CampaignArgs> for CampaignConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CampaignArgs) -> Result<Self, Self::Error> {
        let mut conf = match args.config.as_ref() {
            Some(path) => CampaignConfig::from_path(path)?,
            None => CampaignConfig::default(),
        };
        if let Some(filter_url) = &args.filter_url {
            conf.filter_url = filter_url.to_string();
        }
        if let Some(ledger) = &args.ledger {
            conf.ledger = ledger.clone();
        }
        if let Some(harvest_delay) = args.harvest_delay {
            conf.harvest_delay_secs = harvest_delay;
        }
        if let Some(send_delay) = args.send_delay {
            conf.send_delay_secs = send_delay;
        }
        if let Some(save_every) = args.save_every {
            conf.save_every = save_every;
        }
        if let Some(on_harvest_error) = args.on_harvest_error {
            conf.on_harvest_error = on_harvest_error;
        }
        if let Some(on_send_error) = args.on_send_error {
            conf.on_send_error = on_send_error;
        }
        Ok(conf)
    }
}

/// Download the companies dataset, filter it and fold the matches into the
/// ledger
#[derive(Debug, clap::Args)]
pub struct FetchArgs {
    #[clap(flatten)]
    pub campaign: CampaignArgs,
}

pub fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    let conf = (&args.campaign).try_into()?;
    let summary = prospect_pipeline::fetch(&conf)?;
    println!(
        "{} of {} companies matched, {} new rows, {} in the ledger",
        summary.matched, summary.fetched, summary.added, summary.total
    );
    Ok(())
}

/// Visit pending profile pages and harvest contact emails into the ledger
#[derive(Debug, clap::Args)]
pub struct HarvestArgs {
    #[clap(flatten)]
    pub campaign: CampaignArgs,
    /// Harvest one page and print its emails, leaving the ledger alone
    #[clap(long)]
    pub url: Option<String>,
}

pub fn harvest(args: HarvestArgs) -> anyhow::Result<()> {
    let conf: CampaignConfig = (&args.campaign).try_into()?;
    if let Some(url) = args.url {
        let client = PageClient::new(&conf.pages)?;
        let emails = client.harvest(&url)?;
        if emails.is_empty() {
            println!("No emails found on {url}");
        }
        for email in emails {
            println!("{email}");
        }
        return Ok(());
    }
    let summary = prospect_pipeline::harvest(&conf)?;
    println!(
        "{} pages visited, {} with emails, {} failed",
        summary.visited, summary.with_emails, summary.failed
    );
    Ok(())
}

/// Send the templated message to every harvested address
#[derive(Debug, clap::Args)]
pub struct SendArgs {
    #[clap(flatten)]
    pub campaign: CampaignArgs,
    /// Send a single test message to this address instead of the ledger
    #[clap(long)]
    pub to: Option<String>,
    /// Log what would be sent without calling the mail API
    #[clap(long, conflicts_with = "yes")]
    pub dry_run: bool,
    /// Confirm live sending; without it (or --dry-run) nothing is sent
    #[clap(long)]
    pub yes: bool,
}

pub fn send(args: SendArgs) -> anyhow::Result<()> {
    let conf: CampaignConfig = (&args.campaign).try_into()?;
    let notifier = sender(&conf, args.dry_run, args.yes)?;

    if let Some(to) = args.to {
        let greeting = founder_name("", &to);
        let (subject, body) = conf.outreach.message.render(&greeting);
        let id = notifier.send(&to, &subject, &body)?;
        println!("Sent test message to {to}, id {id}");
        return Ok(());
    }

    let summary = prospect_pipeline::send(&conf, notifier.as_ref())?;
    println!(
        "{} messages sent, {} failed, {} companies marked sent",
        summary.sent, summary.failed, summary.companies
    );
    Ok(())
}

/// Run the whole campaign: fetch, harvest, then send when confirmed
#[derive(Debug, clap::Args)]
pub struct RunArgs {
    #[clap(flatten)]
    pub campaign: CampaignArgs,
    /// Log what would be sent without calling the mail API
    #[clap(long, conflicts_with = "yes")]
    pub dry_run: bool,
    /// Confirm live sending; without it (or --dry-run) the send stage is
    /// skipped
    #[clap(long)]
    pub yes: bool,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let conf: CampaignConfig = (&args.campaign).try_into()?;
    let notifier: Option<Box<dyn Notifier>> = if args.dry_run || args.yes {
        Some(sender(&conf, args.dry_run, args.yes)?)
    } else {
        None
    };

    let report = prospect_pipeline::run(&conf, notifier.as_deref())?;
    println!(
        "{} of {} companies matched, {} new rows",
        report.fetch.matched, report.fetch.fetched, report.fetch.added
    );
    println!(
        "{} pages visited, {} with emails, {} failed",
        report.harvest.visited, report.harvest.with_emails, report.harvest.failed
    );
    match report.send {
        Some(sent) => println!(
            "{} messages sent, {} failed, {} companies marked sent",
            sent.sent, sent.failed, sent.companies
        ),
        None => println!("Send stage skipped, pass --yes or --dry-run to send"),
    }
    Ok(())
}

fn sender(conf: &CampaignConfig, dry_run: bool, yes: bool) -> anyhow::Result<Box<dyn Notifier>> {
    if dry_run {
        return Ok(Box::new(DryRunSender));
    }
    if !yes {
        bail!("Refusing to send live mail without --yes (or use --dry-run)");
    }
    Ok(Box::new(GmailSender::new(&conf.outreach)?))
}

/// Parse a directory URL and print its active filters as JSON
#[derive(Debug, clap::Args)]
pub struct FiltersArgs {
    /// The directory URL to parse
    pub url: String,
}

pub fn filters(args: FiltersArgs) -> anyhow::Result<()> {
    let filters = parse_filters(&args.url);
    println!("{}", serde_json::to_string_pretty(&filters)?);
    Ok(())
}

fn init_logs(quiet: bool) {
    if !quiet {
        env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Fetch(args) => {
            init_logs(args.campaign.quiet);
            fetch(args)
        }
        SubCommand::Harvest(args) => {
            init_logs(args.campaign.quiet);
            harvest(args)
        }
        SubCommand::Send(args) => {
            init_logs(args.campaign.quiet);
            send(args)
        }
        SubCommand::Run(args) => {
            init_logs(args.campaign.quiet);
            run(args)
        }
        SubCommand::Filters(args) => filters(args),
        SubCommand::Completion => {
            generate(
                Shell::Bash,
                &mut Args::command(),
                "prospect",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
