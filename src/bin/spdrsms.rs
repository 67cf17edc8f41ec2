//! `spdrsms`: send an SMS to a single recipient through the Spider gateway.
//!
//! Reads the message text from `--message` or standard input and issues one
//! sendsms request.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use spider_clnt::client::SpiderClient;
use spider_clnt::config::{self, Config};
use spider_clnt::domain::{SendSms, SmsPhoneNumber, SmsRecipient};
use spider_clnt::logging::{self, Verbosity};

#[derive(Parser)]
#[command(name = "spdrsms", version)]
#[command(about = "Send an SMS through the Spider gateway")]
struct Cli {
    /// Config file to read from (default: $SPIDER_CLNT_CONFIG, else
    /// ~/.config/spider_clnt.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Be a little more verbose
    #[arg(short, long)]
    verbose: bool,

    /// Read the message from this file instead of stdin
    #[arg(short, long)]
    message: Option<PathBuf>,

    /// Normalize the recipient to E.164, using this ISO 3166 country code
    /// (e.g. "FR") when the number has no international prefix
    #[arg(short, long)]
    region: Option<String>,

    /// Recipient phone number
    recipient: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            report("spdrsms", err.as_ref());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let verbosity = Verbosity::from_flags(cli.verbose, false);
    let log_file = std::env::var_os("SPIDER_CLNT_LOG").map(PathBuf::from);
    let _guard = logging::init(verbosity, log_file.as_deref());

    let text = read_input(cli.message.as_deref())?;

    let config_path = config::resolve_path(cli.config)?;
    let config = Config::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "loaded config");

    let sms_sender = config.require_sms_sender()?.clone();
    let recipient = match &cli.region {
        Some(region) => {
            let region = SmsPhoneNumber::region(region)?;
            SmsRecipient::from(SmsPhoneNumber::parse(Some(region), &cli.recipient)?)
        }
        None => SmsRecipient::new(&cli.recipient)?,
    };
    let request = SendSms::new(recipient, text, sms_sender)?;

    let mut client = SpiderClient::builder(
        config.base_url.clone(),
        config.username.clone(),
        config.password.clone(),
    )
    .build()?;
    client.login().await?;

    let result = client.send_sms(&request).await?;
    if result.is_success() {
        tracing::info!(recipient = %result.recipient, status = result.status, "sent");
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "spdrsms: sending to {} failed with HTTP status {}",
            result.recipient, result.status
        );
        Ok(ExitCode::FAILURE)
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

fn report(tool: &str, err: &dyn std::error::Error) {
    eprintln!("{tool}: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
