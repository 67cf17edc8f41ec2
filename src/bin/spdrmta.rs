//! `spdrmta`: send a mail message through the Spider gateway.
//!
//! Reads a raw email message from `--message` or standard input, merges the
//! recipients found in its headers with the ones given on the command line,
//! authenticates, and issues one sendmail request per recipient.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use spider_clnt::client::SpiderClient;
use spider_clnt::config::{self, Config, ConfigError};
use spider_clnt::domain::{Recipient, SendMail};
use spider_clnt::logging::{self, Verbosity};
use spider_clnt::parser::{fmt_recipients, parse_message};

#[derive(Parser)]
#[command(name = "spdrmta", version)]
#[command(about = "Send a mail message through the Spider gateway")]
struct Cli {
    /// Config file to read from (default: $SPIDER_CLNT_CONFIG, else
    /// ~/.config/spider_clnt.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Be a little more verbose (default from SPDRMTA_VERBOSE)
    #[arg(short, long)]
    verbose: bool,

    /// Activate debug info (default from SPDRMTA_DEBUG)
    #[arg(short, long)]
    debug: bool,

    /// Sender address; must match the configured sender
    #[arg(short, long)]
    from_email: Option<String>,

    /// Subject used when the message carries none
    #[arg(short, long, default_value = "no subject")]
    subject: String,

    /// Read the message from this file instead of stdin
    #[arg(short, long)]
    message: Option<PathBuf>,

    /// Recipients appended to the ones found in the message headers
    recipients: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            report("spdrmta", err.as_ref());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let verbosity = Verbosity::from_flags(
        cli.verbose || logging::env_flag("SPDRMTA_VERBOSE"),
        cli.debug || logging::env_flag("SPDRMTA_DEBUG"),
    );
    let log_file = std::env::var_os("SPIDER_CLNT_LOG").map(PathBuf::from);
    let _guard = logging::init(verbosity, log_file.as_deref());

    let raw_message = read_input(cli.message.as_deref())?;

    let config_path = config::resolve_path(cli.config)?;
    let config = Config::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "loaded config");

    let sender = config.require_sender()?.clone();
    if let Some(from_email) = &cli.from_email {
        if from_email.trim() != sender.as_str() {
            return Err(ConfigError::SenderMismatch {
                given: from_email.clone(),
                configured: sender.as_str().to_owned(),
            }
            .into());
        }
    }

    let parsed = parse_message(&raw_message)?;
    tracing::info!(
        subject = %parsed.subject,
        header_recipients = parsed.recipients.len(),
        "parsed message"
    );

    let mut recipients = parsed.recipients.clone();
    recipients.extend(fmt_recipients(cli.recipients));
    let recipients = dedup_keep_order(recipients);

    if recipients.is_empty() {
        eprintln!("spdrmta: no recipients found in message headers or arguments");
        return Ok(ExitCode::FAILURE);
    }

    let subject = if parsed.subject.is_empty() {
        cli.subject
    } else {
        parsed.subject
    };

    let mut client = SpiderClient::builder(
        config.base_url.clone(),
        config.username.clone(),
        config.password.clone(),
    )
    .default_sender(sender.clone())
    .build()?;
    client.login().await?;

    let request = SendMail::new(recipients, subject, parsed.body, sender);
    let results = client.send_mail(&request).await?;

    let mut failures = 0usize;
    for result in &results {
        if result.is_success() {
            tracing::info!(recipient = %result.recipient, status = result.status, "sent");
        } else {
            failures += 1;
            eprintln!(
                "spdrmta: sending to {} failed with HTTP status {}",
                result.recipient, result.status
            );
        }
    }

    if failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn read_input(path: Option<&Path>) -> Result<String, std::io::Error> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

/// De-duplicate while keeping the first occurrence's position, so the
/// attempt order stays deterministic.
fn dedup_keep_order(recipients: Vec<Recipient>) -> Vec<Recipient> {
    let mut seen = HashSet::new();
    recipients
        .into_iter()
        .filter(|recipient| seen.insert(recipient.clone()))
        .collect()
}

fn report(tool: &str, err: &dyn std::error::Error) {
    eprintln!("{tool}: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
