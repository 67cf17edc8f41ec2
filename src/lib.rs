//! Command-line mail/SMS transmission client for the Spider messaging
//! gateway.
//!
//! The crate splits into a pure message parser (raw RFC 5322 text to a
//! normalized [`ParsedMessage`]), a transport layer for the gateway's JSON
//! wire formats, and a client layer wrapping one authenticated session:
//! login once, then one HTTP call per mail recipient (or one per SMS).
//! The `spdrmta` and `spdrsms` binaries are thin front ends over this
//! library.
//!
//! ```rust,no_run
//! use spider_clnt::domain::{Password, SendMail, SenderAddress, Username};
//! use spider_clnt::{SpiderClient, parse_message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let raw = "To: a@x.com\r\nSubject: hi\r\n\r\nhello\r\n";
//!     let parsed = parse_message(raw)?;
//!
//!     let mut client = SpiderClient::builder(
//!         url::Url::parse("https://gw.example.com")?,
//!         Username::new("mta-account")?,
//!         Password::new("secret")?,
//!     )
//!     .build()?;
//!     client.login().await?;
//!
//!     let sender = SenderAddress::new("noreply@example.com")?;
//!     let request = SendMail::new(parsed.recipients, parsed.subject, parsed.body, sender);
//!     for result in client.send_mail(&request).await? {
//!         println!("{}: HTTP {}", result.recipient, result.status);
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod logging;
pub mod parser;
mod transport;

pub use client::{AuthError, GatewayError, SendResult, SpiderClient, SpiderClientBuilder};
pub use config::{Config, ConfigError};
pub use domain::{
    ContentType, ParsedMessage, Recipient, SendMail, SendSms, SenderAddress, SmsRecipient,
    SmsSenderId, ValidationError,
};
pub use parser::{MessageError, fmt_recipients, parse_message};
pub use transport::{EscapePolicy, RecipientFormat};
